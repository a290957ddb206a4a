//! Embedded credential store backed by fjall
//!
//! Records are serialized as JSON values keyed by username in a `users`
//! partition; a `meta` partition holds the id counter. Equivalent to a
//! relational user table at the `CredentialStore` interface, interchangeable
//! with the flat-file store.

use authgate_core::{AuthError, CredentialStore, Result, Role, StoredCredential};
use fjall::{Config, Keyspace, Partition, PartitionCreateOptions, PersistMode};
use std::path::Path;
use std::sync::Arc;

const NEXT_ID_KEY: &str = "next_user_id";

/// Credential store backed by an embedded fjall keyspace
#[derive(Clone)]
pub struct DbStore {
    keyspace: Arc<Keyspace>,
    users: Arc<Partition>,
    meta: Arc<Partition>,
}

impl DbStore {
    /// Open (or create) a store at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let keyspace = Arc::new(
            Config::new(path)
                .open()
                .map_err(|e| AuthError::Store(e.to_string()))?,
        );

        let users = Arc::new(
            keyspace
                .open_partition("users", PartitionCreateOptions::default())
                .map_err(|e| AuthError::Store(e.to_string()))?,
        );
        let meta = Arc::new(
            keyspace
                .open_partition("meta", PartitionCreateOptions::default())
                .map_err(|e| AuthError::Store(e.to_string()))?,
        );

        Ok(DbStore {
            keyspace,
            users,
            meta,
        })
    }

    /// Create a store in a temporary directory for testing
    #[cfg(any(test, feature = "test-utils"))]
    pub fn temp() -> Result<(Self, tempfile::TempDir)> {
        let dir = tempfile::tempdir().map_err(|e| AuthError::Store(e.to_string()))?;
        let store = Self::open(dir.path())?;
        Ok((store, dir))
    }

    fn next_user_id(&self) -> Result<i64> {
        let current = match self
            .meta
            .get(NEXT_ID_KEY)
            .map_err(|e| AuthError::Store(e.to_string()))?
        {
            Some(bytes) => {
                let raw: [u8; 8] = bytes[..]
                    .try_into()
                    .map_err(|_| AuthError::Store("corrupt user id counter".to_string()))?;
                i64::from_le_bytes(raw)
            }
            None => 0,
        };

        let next = current + 1;
        self.meta
            .insert(NEXT_ID_KEY, next.to_le_bytes())
            .map_err(|e| AuthError::Store(e.to_string()))?;

        Ok(next)
    }

    fn persist(&self) -> Result<()> {
        self.keyspace
            .persist(PersistMode::SyncAll)
            .map_err(|e| AuthError::Store(e.to_string()))
    }
}

impl CredentialStore for DbStore {
    fn exists(&self, username: &str) -> Result<bool> {
        match self.users.get(username) {
            Ok(record) => Ok(record.is_some()),
            Err(e) => Err(AuthError::Store(e.to_string())),
        }
    }

    fn get(&self, username: &str) -> Result<Option<StoredCredential>> {
        match self.users.get(username) {
            Ok(Some(bytes)) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Ok(None) => Ok(None),
            Err(e) => Err(AuthError::Store(e.to_string())),
        }
    }

    fn insert(&self, username: &str, password_hash: &str, role: Role) -> Result<i64> {
        if self.exists(username)? {
            return Err(AuthError::DuplicateUsername(username.to_string()));
        }

        let user_id = self.next_user_id()?;
        let record = StoredCredential {
            user_id,
            password_hash: password_hash.to_string(),
            role,
        };

        let value = serde_json::to_vec(&record)?;
        self.users
            .insert(username, value)
            .map_err(|e| AuthError::Store(e.to_string()))?;
        self.persist()?;

        Ok(user_id)
    }
}
