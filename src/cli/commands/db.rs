use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::database::DatabaseManager;

#[derive(Subcommand)]
pub enum DbCommands {
    #[command(about = "Apply pending schema migrations")]
    Migrate,

    #[command(about = "Verify the database is reachable")]
    Check,
}

pub async fn handle(cmd: DbCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        DbCommands::Migrate => {
            let pool = super::connect().await?;
            DatabaseManager::migrate(&pool).await?;
            output_success(&output_format, "Migrations applied", None)
        }
        DbCommands::Check => {
            let config = AppConfig::from_env();
            let target = config
                .database
                .url
                .as_deref()
                .map(DatabaseManager::redact_url)
                .unwrap_or_default();

            let result = match DatabaseManager::connect(&config.database).await {
                Ok(pool) => DatabaseManager::health_check(&pool).await,
                Err(e) => Err(e),
            };

            match result {
                Ok(()) => output_success(
                    &output_format,
                    &format!("Database reachable at {}", target),
                    Some(json!({ "database": target })),
                ),
                Err(e) => {
                    output_error(&output_format, &e.to_string(), Some("DATABASE_UNAVAILABLE"))?;
                    anyhow::bail!("database check failed")
                }
            }
        }
    }
}
