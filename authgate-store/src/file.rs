//! Flat-file credential store
//!
//! One record per line: `username,password_hash,role,user_id`. bcrypt hash
//! strings contain no commas, so a plain delimited format is safe. Inserts
//! append; lookups scan. Fine for the small user counts this store serves.

use authgate_core::{AuthError, CredentialStore, Result, Role, StoredCredential};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Credential store backed by a delimited text file
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Open a store at `path`, creating the file (and parent directories)
    /// if missing
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        if !path.exists() {
            File::create(&path)?;
        }

        Ok(FileStore { path })
    }

    /// Create a store in a temporary directory for testing
    #[cfg(any(test, feature = "test-utils"))]
    pub fn temp() -> Result<(Self, tempfile::TempDir)> {
        let dir = tempfile::tempdir()?;
        let store = Self::open(dir.path().join("users.txt"))?;
        Ok((store, dir))
    }

    fn scan(&self) -> Result<Vec<(String, StoredCredential)>> {
        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);

        let mut rows = Vec::new();
        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match Self::parse_line(line) {
                Some(row) => rows.push(row),
                None => {
                    return Err(AuthError::Store(format!(
                        "malformed record in {}",
                        self.path.display()
                    )))
                }
            }
        }
        Ok(rows)
    }

    fn parse_line(line: &str) -> Option<(String, StoredCredential)> {
        let mut parts = line.splitn(4, ',');
        let username = parts.next()?;
        let password_hash = parts.next()?;
        let role = Role::from_str(parts.next()?).ok()?;
        let user_id = parts.next()?.parse().ok()?;

        Some((
            username.to_string(),
            StoredCredential {
                user_id,
                password_hash: password_hash.to_string(),
                role,
            },
        ))
    }
}

impl CredentialStore for FileStore {
    fn exists(&self, username: &str) -> Result<bool> {
        Ok(self.scan()?.iter().any(|(name, _)| name == username))
    }

    fn get(&self, username: &str) -> Result<Option<StoredCredential>> {
        Ok(self
            .scan()?
            .into_iter()
            .find(|(name, _)| name == username)
            .map(|(_, record)| record))
    }

    fn insert(&self, username: &str, password_hash: &str, role: Role) -> Result<i64> {
        let rows = self.scan()?;
        if rows.iter().any(|(name, _)| name == username) {
            return Err(AuthError::DuplicateUsername(username.to_string()));
        }

        let user_id = rows.iter().map(|(_, r)| r.user_id).max().unwrap_or(0) + 1;

        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        writeln!(file, "{},{},{},{}", username, password_hash, role, user_id)?;
        file.sync_all()?;

        Ok(user_id)
    }
}
