use axum::extract::State;

use crate::handlers::SessionResponse;
use crate::middleware::{ApiResponse, ApiResult, ValidatedJson};
use crate::services::Registration;
use crate::state::AppState;

/// POST /api/auth/register
///
/// Creates a plain user account and signs the caller in.
pub async fn register_post(
    State(state): State<AppState>,
    ValidatedJson(registration): ValidatedJson<Registration>,
) -> ApiResult<SessionResponse> {
    let user = state.credentials.register(registration).await?;
    let session = SessionResponse::issue(&state.tokens, user)?;
    Ok(ApiResponse::created(session))
}
