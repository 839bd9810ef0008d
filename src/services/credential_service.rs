use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::password;
use crate::database::models::{NewUser, Role, User};
use crate::database::{DatabaseError, UserRepository};
use crate::services::error::{ServiceError, ServiceResult};

/// Minimum accepted password length
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// POST /api/auth/register body. `role` is accepted for compatibility but
/// every self-registered account is a plain user.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Registration {
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// POST /api/auth/login body
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Credentials {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// PUT /api/auth/password body
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PasswordChange {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

/// Account registration, login and password management
#[derive(Clone)]
pub struct CredentialService {
    users: Arc<dyn UserRepository>,
}

impl CredentialService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn register(&self, registration: Registration) -> ServiceResult<User> {
        let (email, password) = require_pair(registration.email, registration.password)?;
        let email = normalize_email(&email);
        validate_email_format(&email)?;
        validate_password(&password)?;

        if registration.role.is_some() {
            warn!("Ignoring caller-supplied role on registration for {}", email);
        }

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(ServiceError::DuplicateEmail);
        }

        let password_hash = hash_blocking(password).await?;
        let user = self
            .users
            .insert(NewUser {
                email,
                password_hash,
                role: Role::User,
            })
            .await
            .map_err(|e| match e {
                DatabaseError::UniqueViolation(_) => ServiceError::DuplicateEmail,
                other => other.into(),
            })?;

        info!("Registered user {} ({})", user.email, user.id);
        Ok(user)
    }

    /// Unknown email and wrong password produce the same error.
    pub async fn authenticate(&self, credentials: Credentials) -> ServiceResult<User> {
        let (email, password) = require_pair(credentials.email, credentials.password)?;
        let email = normalize_email(&email);

        let Some(user) = self.users.find_by_email(&email).await? else {
            verify_blocking(password, None).await?;
            warn!("Login failed for {}", email);
            return Err(ServiceError::InvalidCredentials);
        };

        if !verify_blocking(password, Some(user.password_hash.clone())).await? {
            warn!("Login failed for {}", email);
            return Err(ServiceError::InvalidCredentials);
        }

        Ok(user)
    }

    /// The only path that rehashes a stored password.
    pub async fn change_password(&self, user_id: Uuid, change: PasswordChange) -> ServiceResult<User> {
        let current = change
            .current_password
            .filter(|p| !p.is_empty())
            .ok_or_else(|| ServiceError::invalid_input("current_password", "Current password is required"))?;
        let new_password = change
            .new_password
            .filter(|p| !p.is_empty())
            .ok_or_else(|| ServiceError::invalid_input("new_password", "New password is required"))?;
        validate_password(&new_password)?;

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(ServiceError::NotFound("User"))?;

        if !verify_blocking(current, Some(user.password_hash.clone())).await? {
            return Err(ServiceError::InvalidCredentials);
        }

        let password_hash = hash_blocking(new_password).await?;
        let user = self
            .users
            .update_password_hash(user_id, &password_hash)
            .await?
            .ok_or(ServiceError::NotFound("User"))?;

        info!("Password changed for user {}", user.id);
        Ok(user)
    }

    pub async fn find_user(&self, user_id: Uuid) -> ServiceResult<Option<User>> {
        Ok(self.users.find_by_id(user_id).await?)
    }

    pub async fn list_users(&self) -> ServiceResult<Vec<User>> {
        Ok(self.users.list().await?)
    }

    /// Changes the role only; the password hash is left alone.
    pub async fn set_role(&self, email: &str, role: Role) -> ServiceResult<User> {
        let email = normalize_email(email);
        let user = self
            .users
            .update_role(&email, role)
            .await?
            .ok_or(ServiceError::NotFound("User"))?;

        info!("User {} now has role {}", user.email, user.role);
        Ok(user)
    }
}

fn require_pair(email: Option<String>, password: Option<String>) -> ServiceResult<(String, String)> {
    match (email, password) {
        (Some(e), Some(p)) if !e.trim().is_empty() && !p.is_empty() => Ok((e, p)),
        _ => Err(ServiceError::invalid_input("email", "Email and password required")),
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Basic shape check for an already-normalized email
pub fn validate_email_format(email: &str) -> ServiceResult<()> {
    let invalid = || ServiceError::invalid_input("email", "Invalid email format");

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') || !domain.contains('.') {
        return Err(invalid());
    }
    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    Ok(())
}

fn validate_password(password: &str) -> ServiceResult<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ServiceError::invalid_input(
            "password",
            format!("Password must be at least {} characters", MIN_PASSWORD_LENGTH),
        ));
    }
    Ok(())
}

async fn hash_blocking(password: String) -> ServiceResult<String> {
    tokio::task::spawn_blocking(move || password::hash_password(&password))
        .await
        .map_err(|e| ServiceError::Internal(e.to_string()))?
        .map_err(ServiceError::from)
}

/// `None` runs against the dummy hash and always reports a mismatch.
async fn verify_blocking(password: String, hash: Option<String>) -> ServiceResult<bool> {
    tokio::task::spawn_blocking(move || match hash {
        Some(hash) => password::verify_password(&password, &hash),
        None => {
            password::verify_dummy(&password);
            false
        }
    })
    .await
    .map_err(|e| ServiceError::Internal(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;

    fn service() -> CredentialService {
        CredentialService::new(Arc::new(MemoryStore::new()))
    }

    fn registration(email: &str, password: &str) -> Registration {
        Registration {
            email: Some(email.to_string()),
            password: Some(password.to_string()),
            role: None,
        }
    }

    fn credentials(email: &str, password: &str) -> Credentials {
        Credentials {
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        }
    }

    #[tokio::test]
    async fn test_register_hashes_and_normalizes() {
        let credentials = service();
        let user = credentials.register(registration("  A@X.com ", "secret1")).await.unwrap();
        assert_eq!(user.email, "a@x.com");
        assert_eq!(user.role, Role::User);
        assert_ne!(user.password_hash, "secret1");
    }

    #[tokio::test]
    async fn test_register_ignores_requested_role() {
        let credentials = service();
        let mut request = registration("boss@x.com", "secret1");
        request.role = Some("admin".to_string());
        let user = credentials.register(request).await.unwrap();
        assert_eq!(user.role, Role::User);
    }

    #[tokio::test]
    async fn test_duplicate_email_in_any_case_fails() {
        let credentials = service();
        credentials.register(registration("a@x.com", "secret1")).await.unwrap();
        let err = credentials
            .register(registration("A@X.COM", "secret2"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateEmail));
    }

    #[tokio::test]
    async fn test_register_requires_fields() {
        let credentials = service();
        let err = credentials
            .register(Registration { email: Some("a@x.com".into()), password: None, role: None })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput { .. }));

        let err = credentials.register(registration("a@x.com", "12345")).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput { field: "password", .. }));

        let err = credentials.register(registration("not-an-email", "secret1")).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput { field: "email", .. }));
    }

    #[tokio::test]
    async fn test_authenticate_failures_look_the_same() {
        let credentials = service();
        credentials.register(registration("a@x.com", "secret1")).await.unwrap();

        let wrong_password = credentials
            .authenticate(super::Credentials {
                email: Some("a@x.com".into()),
                password: Some("wrong".into()),
            })
            .await
            .unwrap_err();
        let unknown_email = credentials
            .authenticate(super::Credentials {
                email: Some("nobody@x.com".into()),
                password: Some("secret1".into()),
            })
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, ServiceError::InvalidCredentials));
        assert!(matches!(unknown_email, ServiceError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn test_authenticate_is_case_insensitive_on_email() {
        let service = service();
        let user = service.register(registration("a@x.com", "secret1")).await.unwrap();
        let found = service.authenticate(credentials("A@x.COM", "secret1")).await.unwrap();
        assert_eq!(found.id, user.id);
    }

    #[tokio::test]
    async fn test_role_change_keeps_password_hash() {
        let service = service();
        let user = service.register(registration("a@x.com", "secret1")).await.unwrap();
        let promoted = service.set_role("A@X.com", Role::Admin).await.unwrap();
        assert_eq!(promoted.role, Role::Admin);
        assert_eq!(promoted.password_hash, user.password_hash);
    }

    #[tokio::test]
    async fn test_change_password_rehashes() {
        let service = service();
        let user = service.register(registration("a@x.com", "secret1")).await.unwrap();

        let err = service
            .change_password(
                user.id,
                PasswordChange {
                    current_password: Some("wrong".into()),
                    new_password: Some("secret2".into()),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidCredentials));

        let updated = service
            .change_password(
                user.id,
                PasswordChange {
                    current_password: Some("secret1".into()),
                    new_password: Some("secret2".into()),
                },
            )
            .await
            .unwrap();
        assert_ne!(updated.password_hash, user.password_hash);
        assert!(service.authenticate(credentials("a@x.com", "secret2")).await.is_ok());
        assert!(service.authenticate(credentials("a@x.com", "secret1")).await.is_err());
    }

    #[test]
    fn test_email_format() {
        assert!(validate_email_format("a@x.com").is_ok());
        assert!(validate_email_format("a@x").is_err());
        assert!(validate_email_format("@x.com").is_err());
        assert!(validate_email_format("a@@x.com").is_err());
        assert!(validate_email_format("a b@x.com").is_err());
    }
}
