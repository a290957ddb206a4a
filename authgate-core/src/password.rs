//! Password hashing and verification
//!
//! bcrypt with a fresh random salt per call; the salt is embedded in the
//! output string, so hashing the same password twice yields different
//! strings while verification recomputes from the stored salt.

use crate::{AuthError, Result};

/// Password length bounds enforced at registration
pub const PASSWORD_MIN_LEN: usize = 6;
pub const PASSWORD_MAX_LEN: usize = 50;

/// Salted adaptive password hasher
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// Create a hasher with the default bcrypt cost
    pub fn new() -> Self {
        PasswordHasher {
            cost: bcrypt::DEFAULT_COST,
        }
    }

    /// Create a hasher with an explicit bcrypt cost. Tests use the minimum
    /// cost (4) to keep hashing fast.
    pub fn with_cost(cost: u32) -> Self {
        PasswordHasher { cost }
    }

    /// Hash a plaintext password, generating a fresh random salt
    pub fn hash(&self, plaintext: &str) -> Result<String> {
        bcrypt::hash(plaintext, self.cost)
            .map_err(|e| AuthError::InvalidInput(format!("password hashing failed: {}", e)))
    }

    /// Verify a plaintext password against a stored hash string.
    ///
    /// Returns `false` for malformed hashes and internal errors alike, so
    /// the outcome never reveals which part of verification failed.
    pub fn verify(&self, plaintext: &str, stored_hash: &str) -> bool {
        bcrypt::verify(plaintext, stored_hash).unwrap_or(false)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate password strength: 6-50 characters, at least one letter and one
/// digit
pub fn validate_password(password: &str) -> Result<()> {
    let len = password.chars().count();
    if len < PASSWORD_MIN_LEN {
        return Err(AuthError::ValidationFailed(format!(
            "Password must be at least {} characters long",
            PASSWORD_MIN_LEN
        )));
    }
    if len > PASSWORD_MAX_LEN {
        return Err(AuthError::ValidationFailed(format!(
            "Password must be no more than {} characters long",
            PASSWORD_MAX_LEN
        )));
    }
    if !password.chars().any(|c| c.is_ascii_alphabetic()) {
        return Err(AuthError::ValidationFailed(
            "Password must contain at least one letter".to_string(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(AuthError::ValidationFailed(
            "Password must contain at least one digit".to_string(),
        ));
    }
    Ok(())
}
