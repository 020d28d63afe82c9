use axum::extract::State;

use crate::database::models::HistoryEntry;
use crate::handlers::extract::Id;
use crate::handlers::AppState;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /api/protocol-history
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<HistoryEntry>> {
    Ok(ApiResponse::success(state.history.get_all().await?))
}

/// GET /api/protocol-history/:id
pub async fn show(State(state): State<AppState>, Id(id): Id) -> ApiResult<HistoryEntry> {
    Ok(ApiResponse::success(state.history.get_by_id(id).await?))
}
