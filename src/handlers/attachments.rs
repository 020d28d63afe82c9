use axum::extract::State;

use crate::database::models::{NewAttachment, AttachmentView};
use crate::handlers::extract::{Body, Id};
use crate::handlers::AppState;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /api/protocols/:id/attachments
pub async fn for_protocol(State(state): State<AppState>, Id(id): Id) -> ApiResult<Vec<AttachmentView>> {
    Ok(ApiResponse::success(state.attachments.for_protocol(id).await?))
}

/// POST /api/protocols/:id/attachments - registers metadata for an already stored file
pub async fn create(
    State(state): State<AppState>,
    Id(id): Id,
    Body(input): Body<NewAttachment>,
) -> ApiResult<AttachmentView> {
    Ok(ApiResponse::created(state.attachments.create(id, input).await?))
}

/// DELETE /api/attachments/:id
pub async fn delete(State(state): State<AppState>, Id(id): Id) -> ApiResult<()> {
    state.attachments.delete(id).await?;
    Ok(ApiResponse::no_content())
}
