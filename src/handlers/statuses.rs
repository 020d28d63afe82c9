use axum::extract::State;

use crate::database::models::{ProtocolStatus, StatusInput};
use crate::handlers::extract::{Body, Id};
use crate::handlers::AppState;
use crate::middleware::{ApiResponse, ApiResult};

pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<ProtocolStatus>> {
    Ok(ApiResponse::success(state.statuses.get_all().await?))
}

pub async fn show(State(state): State<AppState>, Id(id): Id) -> ApiResult<ProtocolStatus> {
    Ok(ApiResponse::success(state.statuses.get_by_id(id).await?))
}

pub async fn create(State(state): State<AppState>, Body(input): Body<StatusInput>) -> ApiResult<ProtocolStatus> {
    Ok(ApiResponse::created(state.statuses.create(input).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Id(id): Id,
    Body(input): Body<StatusInput>,
) -> ApiResult<ProtocolStatus> {
    Ok(ApiResponse::success(state.statuses.update(id, input).await?))
}

/// 409 while protocols or history entries still reference the status
pub async fn delete(State(state): State<AppState>, Id(id): Id) -> ApiResult<()> {
    state.statuses.delete(id).await?;
    Ok(ApiResponse::no_content())
}
