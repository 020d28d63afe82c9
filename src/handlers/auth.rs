use axum::extract::State;

use crate::database::models::User;
use crate::handlers::extract::Body;
use crate::handlers::AppState;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{Credentials, LoginResult, Registration};

/**
 * POST /api/login - verify credentials and issue a JWT
 *
 * Input: `{"email": "...", "password": "..."}`
 * Output: `{"success": true, "data": {"token": "...", "expires_in": 86400, "user": {...}}}`
 */
pub async fn login(State(state): State<AppState>, Body(credentials): Body<Credentials>) -> ApiResult<LoginResult> {
    Ok(ApiResponse::success(state.users.login(credentials).await?))
}

/// POST /api/register - 409 when the email is already registered
pub async fn register(State(state): State<AppState>, Body(input): Body<Registration>) -> ApiResult<User> {
    Ok(ApiResponse::created(state.users.register(input).await?))
}
