use std::time::Duration;

use anyhow::Context;
use serde_json::{json, Value};

use crate::cli::OutputFormat;

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });
            if let Some(data_value) = data {
                response["data"] = data_value;
            }
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Print raw JSON, or render it line by line for text output
pub fn output_value<F>(output_format: &OutputFormat, value: &Value, render: F) -> anyhow::Result<()>
where
    F: Fn(&Value) -> String,
{
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Text => match value {
            Value::Array(items) if items.is_empty() => println!("(none)"),
            Value::Array(items) => {
                for item in items {
                    println!("{}", render(item));
                }
            }
            other => println!("{}", render(other)),
        },
    }
    Ok(())
}

/// String field of a JSON object, or "-" when absent
pub fn field(value: &Value, path: &[&str]) -> String {
    let mut current = value;
    for key in path {
        match current.get(key) {
            Some(next) => current = next,
            None => return "-".to_string(),
        }
    }
    match current {
        Value::String(s) => s.clone(),
        Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}

/// Minimal client for the protocol manager API. Unwraps the success envelope and
/// turns the error envelope into an `anyhow` error.
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            base_url: base_url.into(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get(&self, path: &str) -> anyhow::Result<Value> {
        let response = self
            .http
            .get(self.url(path))
            .send()
            .await
            .with_context(|| format!("request to {} failed", self.base_url))?;
        Self::unwrap(response).await
    }

    pub async fn put(&self, path: &str, body: &Value) -> anyhow::Result<Value> {
        let response = self
            .http
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .with_context(|| format!("request to {} failed", self.base_url))?;
        Self::unwrap(response).await
    }

    async fn unwrap(response: reqwest::Response) -> anyhow::Result<Value> {
        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);

        if status.is_success() && body["success"] == true {
            return Ok(body["data"].clone());
        }

        let message = body["message"].as_str().unwrap_or("unexpected response");
        let code = body["code"].as_str().unwrap_or("UNKNOWN");
        anyhow::bail!("{} {}: {}", status.as_u16(), code, message)
    }
}
