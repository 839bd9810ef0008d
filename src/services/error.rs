use thiserror::Error;
use uuid::Uuid;

use crate::auth::password::PasswordError;
use crate::database::DatabaseError;

/// Domain failures raised by the services
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{message}")]
    InvalidInput { field: &'static str, message: String },

    #[error("Invalid {0} format")]
    InvalidIdentifier(&'static str),

    #[error("Category not found or does not belong to you")]
    InvalidCategory,

    /// Also used for records owned by someone else.
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("User already exists")]
    DuplicateEmail,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn invalid_input(field: &'static str, message: impl Into<String>) -> Self {
        ServiceError::InvalidInput {
            field,
            message: message.into(),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Parses a client-supplied identifier.
pub fn parse_id(value: &str, what: &'static str) -> ServiceResult<Uuid> {
    Uuid::parse_str(value.trim()).map_err(|_| ServiceError::InvalidIdentifier(what))
}

/// Trims a required text field, rejecting missing or blank values.
pub fn required_text(
    value: Option<String>,
    field: &'static str,
    label: &str,
) -> ServiceResult<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ServiceError::invalid_input(field, format!("{} is required", label))),
    }
}

/// Like `required_text` but absent values pass through untouched.
pub fn optional_text(
    value: Option<String>,
    field: &'static str,
    label: &str,
) -> ServiceResult<Option<String>> {
    match value {
        None => Ok(None),
        Some(v) => required_text(Some(v), field, label).map(Some),
    }
}
