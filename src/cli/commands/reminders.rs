use clap::Subcommand;

use crate::cli::utils::{field, output_value, ApiClient};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum ReminderCommands {
    #[command(about = "Unsent reminders due within the next hours")]
    Upcoming {
        #[arg(long, help = "Window in hours (server default when omitted)")]
        hours: Option<i64>,
    },
}

pub async fn handle(cmd: ReminderCommands, client: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ReminderCommands::Upcoming { hours } => {
            let path = match hours {
                Some(h) => format!("/api/reminders/upcoming?hours={}", h),
                None => "/api/reminders/upcoming".to_string(),
            };
            let data = client.get(&path).await?;
            output_value(&output_format, &data, |r| {
                format!(
                    "{}  protocol {}  {}",
                    field(r, &["reminder_date"]),
                    field(r, &["protocol_id"]),
                    field(r, &["reminder_text"])
                )
            })
        }
    }
}
