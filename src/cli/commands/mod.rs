pub mod db;
pub mod server;
pub mod user;

use sqlx::PgPool;

use crate::config::AppConfig;
use crate::database::DatabaseManager;

/// Connect using the same environment the server reads
pub(crate) async fn connect() -> anyhow::Result<PgPool> {
    let config = AppConfig::from_env();
    Ok(DatabaseManager::connect(&config.database).await?)
}
