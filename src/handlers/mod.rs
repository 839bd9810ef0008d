// handlers/mod.rs - three handler tiers
//
// Public (no auth) → Protected (bearer token) → Elevated (admin role)
pub mod public;
pub mod protected;
pub mod elevated;

use serde::Serialize;

use crate::auth::TokenService;
use crate::database::models::User;
use crate::error::ApiError;
use crate::middleware::AuthUser;

/// Body returned by register and login
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub user: AuthUser,
}

impl SessionResponse {
    pub fn issue(tokens: &TokenService, user: User) -> Result<Self, ApiError> {
        let token = tokens.issue(user.id)?;
        Ok(Self {
            token,
            user: AuthUser::from(user),
        })
    }
}
