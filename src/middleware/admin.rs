use axum::{extract::Request, middleware::Next, response::Response};

use crate::error::ApiError;
use super::auth::AuthUser;

/// Admin gate, layered after `authenticate`
pub async fn authorize_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    let user = request
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(|| ApiError::unauthorized("No token provided"))?;

    if !user.is_admin() {
        tracing::warn!("User {} denied admin access to {}", user.email, request.uri().path());
        return Err(ApiError::forbidden("Admin access required"));
    }

    Ok(next.run(request).await)
}
