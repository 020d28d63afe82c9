use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, types::Json, FromRow, Row};

use super::{ProtocolStatus, SalesPersonnel};

/// One immutable ledger row: a protocol moved from `old_status_id` to `new_status_id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ProtocolHistory {
    pub protocol_history_id: i32,
    pub protocol_id: i32,
    /// None only for the creation entry
    pub old_status_id: Option<i32>,
    pub new_status_id: i32,
    pub notes: String,
    pub created_by: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHistoryEntry {
    pub protocol_id: i32,
    pub old_status_id: Option<i32>,
    pub new_status_id: i32,
    pub notes: String,
    pub created_by: i32,
}

impl NewHistoryEntry {
    pub const CREATED_NOTE: &'static str = "Protocol created";

    pub fn creation(protocol_id: i32, status_id: i32, created_by: i32) -> Self {
        Self {
            protocol_id,
            old_status_id: None,
            new_status_id: status_id,
            notes: Self::CREATED_NOTE.to_string(),
            created_by,
        }
    }
}

/// Ledger row with its status and agent references resolved
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    #[serde(flatten)]
    pub history: ProtocolHistory,
    pub previous_status: Option<ProtocolStatus>,
    pub new_status: Option<ProtocolStatus>,
    pub created_by_agent: Option<SalesPersonnel>,
}

impl<'r> FromRow<'r, PgRow> for HistoryEntry {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let previous_status: Option<Json<ProtocolStatus>> = row.try_get("rel_previous_status")?;
        let new_status: Option<Json<ProtocolStatus>> = row.try_get("rel_new_status")?;
        let created_by_agent: Option<Json<SalesPersonnel>> = row.try_get("rel_created_by_agent")?;

        Ok(Self {
            history: ProtocolHistory::from_row(row)?,
            previous_status: previous_status.map(|j| j.0),
            new_status: new_status.map(|j| j.0),
            created_by_agent: created_by_agent.map(|j| j.0),
        })
    }
}
