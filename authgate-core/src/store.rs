//! Credential store interface
//!
//! The narrow storage contract consumed by the auth kernel. Adapters own
//! persistence (flat file, embedded database); the kernel depends only on
//! this trait.

use crate::{Result, Role};
use serde::{Deserialize, Serialize};

/// Stored credential row as returned by a lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCredential {
    /// Store-assigned numeric id, stable for the record's lifetime
    pub user_id: i64,
    /// Opaque salted hash string; never the plaintext
    pub password_hash: String,
    pub role: Role,
}

/// Storage contract for credential records, keyed by username.
///
/// Records are created on registration and never mutated or deleted. The
/// kernel assumes at most one writer at a time; implementations provide no
/// locking of their own.
pub trait CredentialStore: Send + Sync {
    /// Whether a record exists for `username`
    fn exists(&self, username: &str) -> Result<bool>;

    /// Look up the stored credential for `username`
    fn get(&self, username: &str) -> Result<Option<StoredCredential>>;

    /// Persist a new record and return the assigned user id.
    ///
    /// Fails with `DuplicateUsername` when the store enforces uniqueness and
    /// `username` is already present.
    fn insert(&self, username: &str, password_hash: &str, role: Role) -> Result<i64>;
}
