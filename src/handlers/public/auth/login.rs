use axum::extract::State;

use crate::handlers::SessionResponse;
use crate::middleware::{ApiResponse, ApiResult, ValidatedJson};
use crate::services::Credentials;
use crate::state::AppState;

/// POST /api/auth/login
pub async fn login_post(
    State(state): State<AppState>,
    ValidatedJson(credentials): ValidatedJson<Credentials>,
) -> ApiResult<SessionResponse> {
    let user = state.credentials.authenticate(credentials).await?;
    tracing::info!("User {} logged in", user.email);
    Ok(ApiResponse::success(SessionResponse::issue(&state.tokens, user)?))
}
