use anyhow::Context;
use clap::Subcommand;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::database::DatabaseManager;

#[derive(Subcommand)]
pub enum DbCommands {
    #[command(about = "Create any missing tables in DATABASE_URL")]
    Init,
}

pub async fn handle(cmd: DbCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        DbCommands::Init => {
            let pool = DatabaseManager::pool().await.context("failed to connect to DATABASE_URL")?;
            DatabaseManager::bootstrap(&pool).await.context("failed to apply schema")?;
            DatabaseManager::close().await;
            output_success(&output_format, "Database schema is up to date", None)
        }
    }
}
