use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tokio::sync::OnceCell;

use models::db::{connect_with_config, resolve_config};

// Migrations run once per test process
static MIGRATED: OnceCell<bool> = OnceCell::const_new();

/// Fresh connection for the calling test's runtime, or `None` when database
/// tests are skipped or the database cannot be reached.
pub async fn get_db() -> Result<Option<DatabaseConnection>, anyhow::Error> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(None);
    }
    let migrated = MIGRATED
        .get_or_init(|| async {
            let Ok(cfg) = resolve_config() else { return false };
            let Ok(db) = connect_with_config(&cfg).await else {
                eprintln!("skip: cannot connect to db");
                return false;
            };
            migration::Migrator::up(&db, None).await.is_ok()
        })
        .await;
    if !*migrated {
        return Ok(None);
    }

    let mut cfg = resolve_config()?;
    cfg.max_connections = cfg.max_connections.max(5);
    cfg.min_connections = cfg.min_connections.min(1);
    Ok(Some(connect_with_config(&cfg).await?))
}
