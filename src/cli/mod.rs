pub mod commands;
pub mod config;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use utils::ApiClient;

#[derive(Parser)]
#[command(name = "protoctl")]
#[command(about = "protoctl - command-line client for the protocol manager API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(long, global = true, help = "Server base URL (default: PROTOCTL_SERVER or http://localhost:8080)")]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Check server and database health")]
    Health,

    #[command(about = "Protocol reads and status transitions")]
    Protocol {
        #[command(subcommand)]
        cmd: commands::protocol::ProtocolCommands,
    },

    #[command(about = "Reminder queries")]
    Reminders {
        #[command(subcommand)]
        cmd: commands::reminders::ReminderCommands,
    },

    #[command(about = "Database maintenance against DATABASE_URL")]
    Db {
        #[command(subcommand)]
        cmd: commands::db::DbCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

fn client(flag: Option<String>) -> anyhow::Result<ApiClient> {
    let file = config::load_cli_config()?;
    let url = config::resolve_server_url(flag, std::env::var("PROTOCTL_SERVER").ok(), &file);
    tracing::debug!("using server {}", url);
    ApiClient::new(url)
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Health => commands::health::handle(&client(cli.server)?, output_format).await,
        Commands::Protocol { cmd } => commands::protocol::handle(cmd, &client(cli.server)?, output_format).await,
        Commands::Reminders { cmd } => commands::reminders::handle(cmd, &client(cli.server)?, output_format).await,
        Commands::Db { cmd } => commands::db::handle(cmd, output_format).await,
    }
}
