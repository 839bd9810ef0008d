//! Password hashing with bcrypt.
//!
//! Hashes are stored as the standard `$2b$` modular crypt string. The dummy
//! hash lets callers spend the same verification work when no account exists.

use once_cell::sync::Lazy;
use thiserror::Error;

/// bcrypt work factor
pub const HASH_COST: u32 = 10;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}

static DUMMY_HASH: Lazy<String> =
    Lazy::new(|| bcrypt::hash("not-a-real-password", HASH_COST).unwrap_or_default());

pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    Ok(bcrypt::hash(password, HASH_COST)?)
}

/// A malformed stored hash counts as a mismatch.
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

/// Burns one verification against a fixed hash; the result is discarded.
pub fn verify_dummy(password: &str) {
    let _ = verify_password(password, &DUMMY_HASH);
}
