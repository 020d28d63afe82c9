use sqlx::PgPool;

use crate::database::models::HistoryEntry;
use crate::database::{HistoryOrder, HistoryQuery};
use crate::services::error::{ServiceError, ServiceResult};

/// Read side of the history ledger. Entries are only ever written by the transition engine.
#[derive(Clone)]
pub struct HistoryService {
    pool: PgPool,
}

impl HistoryService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_all(&self) -> ServiceResult<Vec<HistoryEntry>> {
        Ok(HistoryQuery::new()
            .order(HistoryOrder::NewestFirst)
            .fetch_all(&self.pool)
            .await?)
    }

    pub async fn get_by_id(&self, history_id: i32) -> ServiceResult<HistoryEntry> {
        HistoryQuery::new()
            .by_id(history_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("history entry {} not found", history_id)))
    }
}
