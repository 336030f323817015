use std::sync::Arc;

use axum::Router;
use configs::AppConfig;
use dotenvy::dotenv;
use migration::MigratorTrait;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use service::restaurant::repo::seaorm::SeaOrmRestaurantRepository;
use service::restaurant::repository::RestaurantRepository;

use crate::errors::StartupError;
use crate::routes::{self, ServerState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load `config.toml` (or `CONFIG_PATH`); fall back to environment variables
/// when the file is missing or invalid.
pub fn load_config() -> anyhow::Result<AppConfig> {
    dotenv().ok();
    match AppConfig::load_and_validate() {
        Ok(cfg) => Ok(cfg),
        Err(e) => {
            warn!(error = %e, "config file unusable, reading environment");
            AppConfig::from_env()
        }
    }
}

/// Connect, migrate when configured, then serve until the listener fails.
pub async fn run_with_config(cfg: AppConfig) -> anyhow::Result<()> {
    let db = models::db::connect_with_config(&cfg.database).await?;
    if cfg.database.run_migrations {
        migration::Migrator::up(&db, None)
            .await
            .map_err(|e| StartupError::Migration(e.to_string()))?;
        info!("migrations applied");
    }

    let repo: Arc<dyn RestaurantRepository> = Arc::new(SeaOrmRestaurantRepository::new(db));
    let app: Router = routes::build_router(ServerState::new(repo), build_cors());

    let bind = cfg.server.bind_addr();
    let listener = TcpListener::bind(bind.as_str())
        .await
        .map_err(|e| StartupError::InvalidConfig(format!("cannot bind {}: {}", bind, e)))?;
    info!(addr = %listener.local_addr()?, "restaurant server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
