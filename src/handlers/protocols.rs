use axum::extract::State;

use crate::database::models::{HistoryEntry, ProtocolView};
use crate::database::HistoryOrder;
use crate::handlers::extract::{Body, Id};
use crate::handlers::AppState;
use crate::middleware::{ApiResponse, ApiResult};
use crate::workflow::{NewProtocol, ProtocolPatch};

/// GET /api/protocols - every protocol with its associations, newest first
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<ProtocolView>> {
    Ok(ApiResponse::success(state.protocols.get_all().await?))
}

/// GET /api/protocols/:id
pub async fn show(State(state): State<AppState>, Id(id): Id) -> ApiResult<ProtocolView> {
    Ok(ApiResponse::success(state.protocols.get_by_id(id).await?))
}

/// GET /api/protocols/status/:status_id
pub async fn by_status(State(state): State<AppState>, Id(status_id): Id) -> ApiResult<Vec<ProtocolView>> {
    Ok(ApiResponse::success(state.protocols.get_by_status(status_id).await?))
}

/// POST /api/protocols - assigns the protocol number and writes the creation history entry
pub async fn create(State(state): State<AppState>, Body(input): Body<NewProtocol>) -> ApiResult<ProtocolView> {
    Ok(ApiResponse::created(state.protocols.create(input).await?))
}

/// PUT|PATCH /api/protocols/:id - partial update; a status change is recorded in the history
pub async fn update(
    State(state): State<AppState>,
    Id(id): Id,
    Body(patch): Body<ProtocolPatch>,
) -> ApiResult<ProtocolView> {
    Ok(ApiResponse::success(state.protocols.update(id, patch).await?))
}

/// DELETE /api/protocols/:id - removes attachments, reminders and history with it
pub async fn delete(State(state): State<AppState>, Id(id): Id) -> ApiResult<()> {
    state.protocols.delete(id).await?;
    Ok(ApiResponse::no_content())
}

/// GET /api/protocols/:id/history - newest entry first
pub async fn history(State(state): State<AppState>, Id(id): Id) -> ApiResult<Vec<HistoryEntry>> {
    Ok(ApiResponse::success(state.protocols.get_history(id, HistoryOrder::NewestFirst).await?))
}
