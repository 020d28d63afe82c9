use chrono::Utc;
use sqlx::PgPool;
use tracing::debug;

use crate::database::models::{HistoryEntry, ProtocolView};
use crate::database::{HistoryOrder, HistoryQuery, ProtocolQuery};
use crate::services::ensure_protocol;
use crate::services::error::{ServiceError, ServiceResult};
use crate::workflow::{NewProtocol, PgTransitionStore, ProtocolDefaults, ProtocolPatch, ProtocolUpdate, TransitionEngine};

/// Protocol reads and the transactional write paths around [`TransitionEngine`]
#[derive(Clone)]
pub struct ProtocolService {
    pool: PgPool,
    defaults: ProtocolDefaults,
}

impl ProtocolService {
    pub fn new(pool: PgPool, defaults: ProtocolDefaults) -> Self {
        Self { pool, defaults }
    }

    pub fn defaults(&self) -> &ProtocolDefaults {
        &self.defaults
    }

    pub async fn get_all(&self) -> ServiceResult<Vec<ProtocolView>> {
        Ok(ProtocolQuery::new().include_all().fetch_all(&self.pool).await?)
    }

    pub async fn get_by_id(&self, protocol_id: i32) -> ServiceResult<ProtocolView> {
        ProtocolQuery::new()
            .include_all()
            .by_id(protocol_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("protocol {} not found", protocol_id)))
    }

    pub async fn get_by_status(&self, status_id: i32) -> ServiceResult<Vec<ProtocolView>> {
        Ok(ProtocolQuery::new()
            .include_all()
            .by_status(status_id)
            .fetch_all(&self.pool)
            .await?)
    }

    /// Ledger for one protocol; `HistoryOrder::default()` is chronological
    pub async fn get_history(&self, protocol_id: i32, order: HistoryOrder) -> ServiceResult<Vec<HistoryEntry>> {
        ensure_protocol(&self.pool, protocol_id).await?;
        Ok(HistoryQuery::new()
            .for_protocol(protocol_id)
            .order(order)
            .fetch_all(&self.pool)
            .await?)
    }

    pub async fn create(&self, input: NewProtocol) -> ServiceResult<ProtocolView> {
        let draft = input.resolve(&self.defaults)?;

        let mut store = PgTransitionStore::begin(&self.pool).await?;
        let protocol = TransitionEngine::create(&mut store, draft, Utc::now()).await?;
        store.commit().await?;

        self.get_by_id(protocol.protocol_id).await
    }

    /// Validate the patch, then apply it and its history entry in one transaction
    pub async fn update(&self, protocol_id: i32, patch: ProtocolPatch) -> ServiceResult<ProtocolView> {
        let update = ProtocolUpdate::try_from(patch)?;

        let mut store = PgTransitionStore::begin(&self.pool).await?;
        let outcome = TransitionEngine::apply_update(&mut store, protocol_id, update, Utc::now()).await?;
        store.commit().await?;

        debug!(
            protocol_id,
            status_changed = outcome.history.is_some(),
            "protocol update committed"
        );
        self.get_by_id(protocol_id).await
    }

    pub async fn delete(&self, protocol_id: i32) -> ServiceResult<()> {
        let mut store = PgTransitionStore::begin(&self.pool).await?;
        TransitionEngine::delete(&mut store, protocol_id).await?;
        store.commit().await?;
        Ok(())
    }
}
