//! Error types for authgate

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Username already taken: {0}")]
    DuplicateUsername(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Invalid password")]
    InvalidPassword,

    #[error("Token verification failed")]
    TokenInvalid,

    #[error("Credential store error: {0}")]
    Store(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AuthError {
    /// Whether this is a failed credential check (unknown user or wrong
    /// password). Callers presenting errors to end users collapse both into
    /// one generic message so usernames cannot be enumerated.
    pub fn is_credential_failure(&self) -> bool {
        matches!(self, AuthError::UserNotFound(_) | AuthError::InvalidPassword)
    }
}
