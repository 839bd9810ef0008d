use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use serde::Serialize;
use uuid::Uuid;

use crate::database::models::{Role, User};
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated user context resolved from the bearer token
#[derive(Clone, Debug, Serialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<User> for AuthUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            role: user.role,
        }
    }
}

/// Verifies the bearer token and attaches the current user to the request.
/// A token whose user has since disappeared is rejected like any bad token.
pub async fn authenticate(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers).map_err(|msg| {
        tracing::warn!("Rejected request to {}: {}", request.uri().path(), msg);
        ApiError::unauthorized(msg)
    })?;

    let user_id = state.tokens.verify(token).map_err(|e| {
        tracing::warn!("Rejected token on {}: {}", request.uri().path(), e);
        ApiError::from(e)
    })?;

    let user = state
        .credentials
        .find_user(user_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Token for unknown user {}", user_id);
            ApiError::unauthorized("User not found")
        })?;

    tracing::debug!("Authenticated {} ({}) as {}", user.email, user.id, user.role);
    request.extensions_mut().insert(AuthUser::from(user));

    Ok(next.run(request).await)
}

/// Extract the token from an `Authorization: Bearer <token>` header
fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, &'static str> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or("No token provided")?;

    let auth_str = auth_header.to_str().map_err(|_| "Invalid token")?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        _ => Err("No token provided"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_extracts_bearer_token() {
        assert_eq!(extract_bearer_token(&headers("Bearer abc.def")).unwrap(), "abc.def");
    }

    #[test]
    fn test_rejects_missing_or_foreign_scheme() {
        assert_eq!(extract_bearer_token(&HeaderMap::new()), Err("No token provided"));
        assert_eq!(extract_bearer_token(&headers("Basic dXNlcg==")), Err("No token provided"));
        assert_eq!(extract_bearer_token(&headers("Bearer   ")), Err("No token provided"));
    }
}
