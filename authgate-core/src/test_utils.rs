//! Test utilities: in-memory credential store

use crate::{AuthError, CredentialStore, Result, Role, StoredCredential};
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory credential store. Records live for the process lifetime; ids
/// are assigned in insertion order starting at 1.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, StoredCredential>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }
}

impl CredentialStore for MemoryStore {
    fn exists(&self, username: &str) -> Result<bool> {
        Ok(self.records.lock().unwrap().contains_key(username))
    }

    fn get(&self, username: &str) -> Result<Option<StoredCredential>> {
        Ok(self.records.lock().unwrap().get(username).cloned())
    }

    fn insert(&self, username: &str, password_hash: &str, role: Role) -> Result<i64> {
        let mut records = self.records.lock().unwrap();
        if records.contains_key(username) {
            return Err(AuthError::DuplicateUsername(username.to_string()));
        }

        let user_id = records.len() as i64 + 1;
        records.insert(
            username.to_string(),
            StoredCredential {
                user_id,
                password_hash: password_hash.to_string(),
                role,
            },
        );
        Ok(user_id)
    }
}
