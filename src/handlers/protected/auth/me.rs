use axum::{extract::State, Extension};

use crate::database::models::User;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// GET /api/auth/me
pub async fn me_get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<User> {
    let user = state
        .credentials
        .find_user(auth.id)
        .await?
        .ok_or_else(|| ApiError::unauthorized("User not found"))?;
    Ok(ApiResponse::success(user))
}
