use axum::extract::State;

use crate::database::models::User;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /api/admin/users
pub async fn users_get(State(state): State<AppState>) -> ApiResult<Vec<User>> {
    Ok(ApiResponse::success(state.credentials.list_users().await?))
}
