mod common;

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use reqwest::StatusCode;
use serde_json::json;

use common::{Api, Fixture};

#[tokio::test]
async fn upcoming_returns_only_unsent_reminders_in_window() -> Result<()> {
    let Some(server) = common::ensure_server().await? else { return Ok(()) };
    let api = Api::new(server);
    let fx = Fixture::create(&api).await?;

    let protocol = api.create("/api/protocols", fx.protocol_body("Reminder host")).await?;
    let id = protocol["protocol_id"].as_i64().context("protocol_id")?;
    let path = format!("/api/protocols/{}/reminders", id);

    let soon = api
        .create(
            &path,
            json!({ "reminder_text": "Soon", "reminder_date": Utc::now() + Duration::hours(2), "created_by": fx.agent_id }),
        )
        .await?;
    let later = api
        .create(
            &path,
            json!({ "reminder_text": "Later", "reminder_date": Utc::now() + Duration::hours(72), "created_by": fx.agent_id }),
        )
        .await?;
    let sent = api
        .create(
            &path,
            json!({ "reminder_text": "Sent", "reminder_date": Utc::now() + Duration::hours(3), "created_by": fx.agent_id }),
        )
        .await?;

    assert_eq!(soon["created_by_agent"]["last_name"], "Souza");

    let sent_id = sent["reminder_id"].as_i64().context("reminder_id")?;
    let (status, body) = api.put(&format!("/api/reminders/{}/mark-sent", sent_id), json!({})).await?;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["is_sent"], true);

    let (status, body) = api.get("/api/reminders/upcoming?hours=24").await?;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = body["data"]
        .as_array()
        .context("array")?
        .iter()
        .filter_map(|r| r["reminder_id"].as_i64())
        .collect();
    assert!(ids.contains(&soon["reminder_id"].as_i64().context("reminder_id")?));
    assert!(!ids.contains(&later["reminder_id"].as_i64().context("reminder_id")?));
    assert!(!ids.contains(&sent_id));

    // Per-protocol listing is ordered by due date and names the creating agent
    let (_, body) = api.get(&path).await?;
    for reminder in body["data"].as_array().context("array")? {
        assert_eq!(reminder["created_by_agent"]["personnel_id"], fx.agent_id);
        assert_eq!(reminder["created_by_agent"]["first_name"], "Ana");
    }
    let texts: Vec<&str> = body["data"]
        .as_array()
        .context("array")?
        .iter()
        .filter_map(|r| r["reminder_text"].as_str())
        .collect();
    assert_eq!(texts, vec!["Soon", "Sent", "Later"]);
    Ok(())
}

#[tokio::test]
async fn reminder_update_and_delete() -> Result<()> {
    let Some(server) = common::ensure_server().await? else { return Ok(()) };
    let api = Api::new(server);
    let fx = Fixture::create(&api).await?;

    let protocol = api.create("/api/protocols", fx.protocol_body("Reminder edits")).await?;
    let id = protocol["protocol_id"].as_i64().context("protocol_id")?;
    let reminder = api
        .create(
            &format!("/api/protocols/{}/reminders", id),
            json!({ "reminder_text": "Draft", "reminder_date": "2031-05-01T12:00:00Z", "created_by": fx.agent_id }),
        )
        .await?;
    let reminder_path = format!("/api/reminders/{}", reminder["reminder_id"].as_i64().context("reminder_id")?);

    let (status, body) = api
        .put(&reminder_path, json!({ "reminder_text": "Final", "is_completed": true }))
        .await?;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["reminder_text"], "Final");
    assert_eq!(body["data"]["is_completed"], true);
    assert_eq!(body["data"]["is_sent"], false);
    assert_eq!(body["data"]["created_by_agent"]["personnel_id"], fx.agent_id);

    let (status, _) = api.put(&reminder_path, json!({})).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = api.delete(&reminder_path).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = api.delete(&reminder_path).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn reminders_need_an_existing_protocol() -> Result<()> {
    let Some(server) = common::ensure_server().await? else { return Ok(()) };
    let api = Api::new(server);

    let (status, _) = api.get("/api/protocols/999999999/reminders").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}
