use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, types::Json, FromRow, Row};

use super::SalesPersonnel;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ProtocolReminder {
    pub reminder_id: i32,
    pub protocol_id: i32,
    pub reminder_text: String,
    pub reminder_message: String,
    pub reminder_date: DateTime<Utc>,
    pub is_completed: bool,
    pub is_sent: bool,
    pub created_by: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReminderView {
    #[serde(flatten)]
    pub reminder: ProtocolReminder,
    pub created_by_agent: Option<SalesPersonnel>,
}

impl<'r> FromRow<'r, PgRow> for ReminderView {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let agent: Option<Json<SalesPersonnel>> = row.try_get("rel_created_by_agent")?;
        Ok(Self {
            reminder: ProtocolReminder::from_row(row)?,
            created_by_agent: agent.map(|j| j.0),
        })
    }
}

/// Body of `POST /api/protocols/:id/reminders`; the protocol comes from the path
#[derive(Debug, Clone, Deserialize)]
pub struct NewReminder {
    pub reminder_text: String,
    #[serde(default)]
    pub reminder_message: String,
    pub reminder_date: DateTime<Utc>,
    pub created_by: i32,
}

/// Partial reminder update; absent fields keep their stored value
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReminderPatch {
    pub reminder_text: Option<String>,
    pub reminder_message: Option<String>,
    pub reminder_date: Option<DateTime<Utc>>,
    pub is_completed: Option<bool>,
    pub is_sent: Option<bool>,
}

impl ReminderPatch {
    pub fn is_empty(&self) -> bool {
        self.reminder_text.is_none()
            && self.reminder_message.is_none()
            && self.reminder_date.is_none()
            && self.is_completed.is_none()
            && self.is_sent.is_none()
    }
}
