use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, types::Json, FromRow, Row};

use super::SalesPersonnel;

/// Metadata for a file attached to a protocol. The bytes live outside the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ProtocolAttachment {
    pub attachment_id: i32,
    pub protocol_id: i32,
    pub file_name: String,
    pub file_path: String,
    pub file_size: i64,
    pub content_type: String,
    pub description: String,
    pub uploaded_by: i32,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewAttachment {
    pub file_name: String,
    pub file_path: String,
    #[serde(default)]
    pub file_size: i64,
    #[serde(default)]
    pub content_type: String,
    #[serde(default)]
    pub description: String,
    pub uploaded_by: i32,
}

/// Attachment with the uploading agent resolved
#[derive(Debug, Clone, Serialize)]
pub struct AttachmentView {
    #[serde(flatten)]
    pub attachment: ProtocolAttachment,
    pub uploaded_by_agent: Option<SalesPersonnel>,
}

impl<'r> FromRow<'r, PgRow> for AttachmentView {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let agent: Option<Json<SalesPersonnel>> = row.try_get("rel_uploaded_by_agent")?;
        Ok(Self {
            attachment: ProtocolAttachment::from_row(row)?,
            uploaded_by_agent: agent.map(|j| j.0),
        })
    }
}
