use std::time::Duration;

use configs::{AppConfig, DatabaseConfig};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

/// Open a pooled connection using the pool settings from `cfg`.
pub async fn connect_with_config(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let mut opts = ConnectOptions::new(cfg.url.clone());
    opts.max_connections(cfg.max_connections)
        .min_connections(cfg.min_connections)
        .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(cfg.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(cfg.max_lifetime_secs))
        .sqlx_logging(cfg.sqlx_logging);
    let db = Database::connect(opts).await?;
    info!(max = cfg.max_connections, min = cfg.min_connections, "database pool ready");
    Ok(db)
}

/// Resolve database settings from `config.toml` (or `CONFIG_PATH`), falling
/// back to `DATABASE_URL` with default pool settings.
pub fn resolve_config() -> anyhow::Result<DatabaseConfig> {
    // Load .env if present
    let _ = dotenvy::dotenv();
    let cfg = match AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(_) => AppConfig::from_env()?,
    };
    Ok(cfg.database)
}

pub async fn connect() -> anyhow::Result<DatabaseConnection> {
    let cfg = resolve_config()?;
    connect_with_config(&cfg).await
}
