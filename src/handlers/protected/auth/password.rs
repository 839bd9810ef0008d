use axum::{extract::State, Extension};
use serde_json::Value;

use crate::middleware::{ApiResponse, ApiResult, AuthUser, ValidatedJson};
use crate::services::PasswordChange;
use crate::state::AppState;

/// PUT /api/auth/password
///
/// Existing tokens stay valid; only the stored hash changes.
pub async fn password_put(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ValidatedJson(change): ValidatedJson<PasswordChange>,
) -> ApiResult<Value> {
    state.credentials.change_password(auth.id, change).await?;
    Ok(ApiResponse::message("Password updated"))
}
