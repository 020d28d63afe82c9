use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ProtocolType {
    pub type_id: i32,
    pub type_name: String,
    pub description: String,
    pub default_deadline_days: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProtocolTypeInput {
    pub type_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub default_deadline_days: i32,
}
