use crate::cli::utils::{field, output_value, ApiClient};
use crate::cli::OutputFormat;

/// Ask the server for `/health` and report the database state
pub async fn handle(client: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    let data = client.get("/health").await?;
    output_value(&output_format, &data, |v| {
        format!("status: {}  database: {}", field(v, &["status"]), field(v, &["database"]))
    })
}
