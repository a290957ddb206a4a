//! Registration and login orchestration
//!
//! The kernel validates input, hashes and verifies passwords, and consults
//! the credential store. Token issuance lives in [`crate::token`] so hashing
//! and storage concerns stay decoupled from token concerns: `login` returns
//! the stored role and id, and the caller decides whether to issue a token.

use crate::{
    validate_password, AuthError, CredentialStore, PasswordHasher, Result, Role, Username,
};

/// Outcome of a successful registration
#[derive(Debug, Clone)]
pub struct RegisteredUser {
    pub user_id: i64,
    pub username: Username,
    pub role: Role,
}

/// Outcome of a successful login
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    pub role: Role,
}

/// Auth kernel: constructed once at process start with its store injected,
/// passed by reference to callers. No global state.
pub struct AuthKernel {
    store: Box<dyn CredentialStore>,
    hasher: PasswordHasher,
}

impl AuthKernel {
    /// Create a kernel over a credential store with the default hasher
    pub fn new(store: Box<dyn CredentialStore>) -> Self {
        Self::with_hasher(store, PasswordHasher::new())
    }

    /// Create a kernel with an explicit hasher (tests use a low-cost one)
    pub fn with_hasher(store: Box<dyn CredentialStore>, hasher: PasswordHasher) -> Self {
        AuthKernel { store, hasher }
    }

    /// Register a new user.
    ///
    /// Validation order, first failure wins: username format, password
    /// policy, then the duplicate check against the store. The existence
    /// check and insert are two separate store calls; concurrent
    /// registrations of the same name can race (accepted limitation, the
    /// kernel adds no locking).
    pub fn register(&self, username: &str, password: &str, role: Role) -> Result<RegisteredUser> {
        let username = Username::new(username)?;
        validate_password(password)?;

        if self.store.exists(username.as_str())? {
            return Err(AuthError::DuplicateUsername(username.to_string()));
        }

        let password_hash = self.hasher.hash(password)?;
        let user_id = self
            .store
            .insert(username.as_str(), &password_hash, role)?;

        Ok(RegisteredUser {
            user_id,
            username,
            role,
        })
    }

    /// Authenticate a username/password pair against the store.
    ///
    /// Returns the stored role and id on success. `UserNotFound` and
    /// `InvalidPassword` are distinct kinds here; user-facing callers
    /// collapse them (see [`AuthError::is_credential_failure`]).
    pub fn login(&self, username: &str, password: &str) -> Result<AuthenticatedUser> {
        let record = self
            .store
            .get(username)?
            .ok_or_else(|| AuthError::UserNotFound(username.to_string()))?;

        if !self.hasher.verify(password, &record.password_hash) {
            return Err(AuthError::InvalidPassword);
        }

        Ok(AuthenticatedUser {
            user_id: record.user_id,
            role: record.role,
        })
    }
}
