mod common;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::json;

use common::Api;

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let Some(server) = common::ensure_server().await? else { return Ok(()) };
    let api = Api::new(server);

    let (status, body) = api.get("/health").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["database"], "ok");
    Ok(())
}

#[tokio::test]
async fn register_then_login() -> Result<()> {
    let Some(server) = common::ensure_server().await? else { return Ok(()) };
    let api = Api::new(server);
    let email = format!("{}@example.com", common::unique("user"));

    let user = api
        .create("/api/register", json!({ "email": email, "password": "correct horse" }))
        .await?;
    assert_eq!(user["email"], email.as_str());
    assert_eq!(user["role"], "agent");
    assert!(user.get("password_hash").is_none());

    let (status, body) = api
        .post("/api/register", json!({ "email": email, "password": "another password" }))
        .await?;
    assert_eq!(status, StatusCode::CONFLICT, "{}", body);

    let (status, body) = api
        .post("/api/login", json!({ "email": email.to_uppercase(), "password": "correct horse" }))
        .await?;
    assert_eq!(status, StatusCode::OK, "{}", body);
    let token = body["data"]["token"].as_str().context("token")?;
    assert_eq!(token.split('.').count(), 3);
    assert_eq!(body["data"]["user"]["email"], email.as_str());

    let (status, body) = api
        .post("/api/login", json!({ "email": email, "password": "wrong horse" }))
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
    Ok(())
}
