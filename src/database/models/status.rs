use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Lifecycle state of a protocol. Reference data: the transition engine only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ProtocolStatus {
    pub status_id: i32,
    pub status_name: String,
    pub color: String,
    /// Entering a terminal status stamps `closed_at` on the protocol
    pub is_terminal: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusInput {
    pub status_name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub is_terminal: bool,
}
