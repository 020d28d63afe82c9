use axum::extract::State;
use serde::Deserialize;

use crate::database::models::{NewReminder, ReminderView, ReminderPatch};
use crate::handlers::extract::{Body, Id, Params};
use crate::handlers::AppState;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct UpcomingQuery {
    pub hours: Option<i64>,
}

/// GET /api/protocols/:id/reminders - soonest first
pub async fn for_protocol(State(state): State<AppState>, Id(id): Id) -> ApiResult<Vec<ReminderView>> {
    Ok(ApiResponse::success(state.reminders.for_protocol(id).await?))
}

/// POST /api/protocols/:id/reminders
pub async fn create(
    State(state): State<AppState>,
    Id(id): Id,
    Body(input): Body<NewReminder>,
) -> ApiResult<ReminderView> {
    Ok(ApiResponse::created(state.reminders.create(id, input).await?))
}

/// GET /api/reminders/upcoming?hours=N
pub async fn upcoming(
    State(state): State<AppState>,
    Params(query): Params<UpcomingQuery>,
) -> ApiResult<Vec<ReminderView>> {
    Ok(ApiResponse::success(state.reminders.upcoming(query.hours).await?))
}

/// PUT /api/reminders/:id
pub async fn update(
    State(state): State<AppState>,
    Id(id): Id,
    Body(patch): Body<ReminderPatch>,
) -> ApiResult<ReminderView> {
    Ok(ApiResponse::success(state.reminders.update(id, patch).await?))
}

/// PUT /api/reminders/:id/mark-sent
pub async fn mark_sent(State(state): State<AppState>, Id(id): Id) -> ApiResult<ReminderView> {
    Ok(ApiResponse::success(state.reminders.mark_sent(id).await?))
}

/// DELETE /api/reminders/:id
pub async fn delete(State(state): State<AppState>, Id(id): Id) -> ApiResult<()> {
    state.reminders.delete(id).await?;
    Ok(ApiResponse::no_content())
}
