#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Spawn the already-built binary to keep start fast during tests
        // Assumes debug profile; adjust if you run tests with --release
        let mut cmd = Command::new("target/debug/protocol-manager");
        cmd.env("PROTOCOL_API_PORT", port.to_string())
            .env("DATABASE_BOOTSTRAP_SCHEMA", "true")
            .env("SECURITY_PASSWORD_COST", "4")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

/// Start the server once per test binary. None when no database is configured,
/// in which case callers skip.
pub async fn ensure_server() -> Result<Option<&'static TestServer>> {
    let _ = dotenvy::dotenv();
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL not set; skipping integration test");
        return Ok(None);
    }

    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(Some(server))
}

/// Thin JSON client that returns the status with the decoded body
pub struct Api {
    base_url: String,
    http: reqwest::Client,
}

impl Api {
    pub fn new(server: &TestServer) -> Self {
        Self {
            base_url: server.base_url.clone(),
            http: reqwest::Client::new(),
        }
    }

    async fn decode(res: reqwest::Response) -> Result<(StatusCode, Value)> {
        let status = res.status();
        let bytes = res.bytes().await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).with_context(|| format!("non-JSON body with status {}", status))?
        };
        Ok((status, body))
    }

    pub async fn get(&self, path: &str) -> Result<(StatusCode, Value)> {
        Self::decode(self.http.get(format!("{}{}", self.base_url, path)).send().await?).await
    }

    pub async fn post(&self, path: &str, body: Value) -> Result<(StatusCode, Value)> {
        Self::decode(self.http.post(format!("{}{}", self.base_url, path)).json(&body).send().await?).await
    }

    pub async fn put(&self, path: &str, body: Value) -> Result<(StatusCode, Value)> {
        Self::decode(self.http.put(format!("{}{}", self.base_url, path)).json(&body).send().await?).await
    }

    pub async fn delete(&self, path: &str) -> Result<(StatusCode, Value)> {
        Self::decode(self.http.delete(format!("{}{}", self.base_url, path)).send().await?).await
    }

    /// POST that must succeed with 201; returns `data`
    pub async fn create(&self, path: &str, body: Value) -> Result<Value> {
        let (status, body) = self.post(path, body).await?;
        anyhow::ensure!(status == StatusCode::CREATED, "POST {} returned {}: {}", path, status, body);
        Ok(body["data"].clone())
    }
}

pub fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, uuid::Uuid::new_v4().simple())
}

/// Reference rows a protocol needs, created fresh for each test
pub struct Fixture {
    pub branch_id: i64,
    pub agent_id: i64,
    pub assignee_id: i64,
    pub customer_id: i64,
    pub type_id: i64,
    pub open_status_id: i64,
    pub review_status_id: i64,
    pub closed_status_id: i64,
}

impl Fixture {
    pub async fn create(api: &Api) -> Result<Self> {
        let branch = api
            .create("/api/branches", json!({ "branch_name": "Central", "branch_code": unique("BR") }))
            .await?;
        let branch_id = branch["branch_id"].as_i64().context("branch_id")?;

        let agent = api
            .create(
                "/api/personnel",
                json!({ "first_name": "Ana", "last_name": "Souza", "email": format!("{}@example.com", unique("agent")), "branch_id": branch_id }),
            )
            .await?;
        let assignee = api
            .create(
                "/api/personnel",
                json!({ "first_name": "Rui", "last_name": "Lima", "email": format!("{}@example.com", unique("agent")), "branch_id": branch_id }),
            )
            .await?;
        let customer = api
            .create(
                "/api/customers",
                json!({ "first_name": "Carla", "last_name": "Dias", "email": format!("{}@example.com", unique("customer")) }),
            )
            .await?;
        let protocol_type = api
            .create("/api/protocol-types", json!({ "type_name": unique("Claim"), "default_deadline_days": 10 }))
            .await?;
        let open = api
            .create("/api/protocol-statuses", json!({ "status_name": "Open", "color": "#00f" }))
            .await?;
        let review = api
            .create("/api/protocol-statuses", json!({ "status_name": "In review" }))
            .await?;
        let closed = api
            .create("/api/protocol-statuses", json!({ "status_name": "Closed", "is_terminal": true }))
            .await?;

        Ok(Self {
            branch_id,
            agent_id: agent["personnel_id"].as_i64().context("personnel_id")?,
            assignee_id: assignee["personnel_id"].as_i64().context("personnel_id")?,
            customer_id: customer["customer_id"].as_i64().context("customer_id")?,
            type_id: protocol_type["type_id"].as_i64().context("type_id")?,
            open_status_id: open["status_id"].as_i64().context("status_id")?,
            review_status_id: review["status_id"].as_i64().context("status_id")?,
            closed_status_id: closed["status_id"].as_i64().context("status_id")?,
        })
    }

    pub fn protocol_body(&self, title: &str) -> Value {
        json!({
            "title": title,
            "description": "Hail damage to roof",
            "type_id": self.type_id,
            "status_id": self.open_status_id,
            "customer_id": self.customer_id,
            "branch_id": self.branch_id,
            "assigned_to": self.assignee_id,
            "created_by": self.agent_id,
            "priority": "medium"
        })
    }
}
