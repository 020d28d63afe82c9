use clap::Subcommand;
use serde_json::{json, Value};

use crate::cli::utils::{field, output_success, output_value, ApiClient};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum ProtocolCommands {
    #[command(about = "List protocols, newest first")]
    List {
        #[arg(long, help = "Only protocols in this status")]
        status: Option<i32>,
    },

    #[command(about = "Show one protocol with its associations")]
    Show {
        #[arg(help = "Protocol ID")]
        id: i32,
    },

    #[command(about = "Show the status history of a protocol, newest first")]
    History {
        #[arg(help = "Protocol ID")]
        id: i32,
    },

    #[command(about = "Move a protocol to another status")]
    Transition {
        #[arg(help = "Protocol ID")]
        id: i32,
        #[arg(help = "Target status ID")]
        status: i32,
        #[arg(long, help = "Note stored on the history entry")]
        notes: Option<String>,
        #[arg(long = "by", help = "Personnel ID credited with the change")]
        acting_personnel_id: Option<i32>,
    },
}

fn protocol_line(p: &Value) -> String {
    format!(
        "{:<10} {:<14} {:<7} {}",
        field(p, &["protocol_number"]),
        field(p, &["status", "status_name"]),
        field(p, &["priority"]),
        field(p, &["title"])
    )
}

fn history_line(h: &Value) -> String {
    format!(
        "{}  {} -> {}  by {}  {}",
        field(h, &["created_at"]),
        field(h, &["previous_status", "status_name"]),
        field(h, &["new_status", "status_name"]),
        field(h, &["created_by"]),
        field(h, &["notes"])
    )
}

/// Body of the PUT that performs a transition
pub fn transition_body(status: i32, notes: Option<String>, acting_personnel_id: Option<i32>) -> Value {
    let mut body = json!({ "status_id": status });
    if let Some(notes) = notes {
        body["notes"] = json!(notes);
    }
    if let Some(by) = acting_personnel_id {
        body["acting_personnel_id"] = json!(by);
    }
    body
}

pub async fn handle(cmd: ProtocolCommands, client: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ProtocolCommands::List { status } => {
            let path = match status {
                Some(status_id) => format!("/api/protocols/status/{}", status_id),
                None => "/api/protocols".to_string(),
            };
            let data = client.get(&path).await?;
            output_value(&output_format, &data, protocol_line)
        }
        ProtocolCommands::Show { id } => {
            let data = client.get(&format!("/api/protocols/{}", id)).await?;
            output_value(&output_format, &data, |p| {
                format!(
                    "{}\nassigned: {}  deadline: {}  closed: {}",
                    protocol_line(p),
                    field(p, &["assigned_agent", "email"]),
                    field(p, &["deadline"]),
                    field(p, &["closed_at"])
                )
            })
        }
        ProtocolCommands::History { id } => {
            let data = client.get(&format!("/api/protocols/{}/history", id)).await?;
            output_value(&output_format, &data, history_line)
        }
        ProtocolCommands::Transition {
            id,
            status,
            notes,
            acting_personnel_id,
        } => {
            let body = transition_body(status, notes, acting_personnel_id);
            let data = client.put(&format!("/api/protocols/{}", id), &body).await?;
            output_success(
                &output_format,
                &format!(
                    "Protocol {} is now '{}'",
                    field(&data, &["protocol_number"]),
                    field(&data, &["status", "status_name"])
                ),
                Some(data),
            )
        }
    }
}
