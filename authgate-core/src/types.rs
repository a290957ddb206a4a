//! Core data types for the authentication kernel

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Username length bounds enforced at registration
pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 20;

/// Validated username: 3-20 characters, letters, digits and underscore only
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Username(String);

impl Username {
    /// Create a new username with validation
    pub fn new(name: &str) -> crate::Result<Self> {
        validate_username(name)?;
        Ok(Username(name.to_string()))
    }

    /// Get the username as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validate username format: non-empty, 3-20 characters, `[A-Za-z0-9_]+`
pub fn validate_username(name: &str) -> crate::Result<()> {
    if name.is_empty() {
        return Err(crate::AuthError::ValidationFailed(
            "Username cannot be empty".to_string(),
        ));
    }

    let len = name.chars().count();
    if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len) {
        return Err(crate::AuthError::ValidationFailed(format!(
            "Username must be {}-{} characters long",
            USERNAME_MIN_LEN, USERNAME_MAX_LEN
        )));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(crate::AuthError::ValidationFailed(
            "Username can only contain letters, numbers and underscore".to_string(),
        ));
    }

    Ok(())
}

/// Role in the fixed hierarchy `user < analyst < admin`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Analyst,
    Admin,
}

impl Role {
    /// Numeric privilege level used for permission comparisons
    pub fn level(self) -> u8 {
        match self {
            Role::User => 1,
            Role::Analyst => 2,
            Role::Admin => 3,
        }
    }

    /// Get the role name as stored and transmitted
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Analyst => "analyst",
            Role::Admin => "admin",
        }
    }

    /// True iff this role is at least as privileged as `required`
    pub fn allows(self, required: Role) -> bool {
        self.level() >= required.level()
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

impl FromStr for Role {
    type Err = crate::AuthError;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "user" => Ok(Role::User),
            "analyst" => Ok(Role::Analyst),
            "admin" => Ok(Role::Admin),
            other => Err(crate::AuthError::ValidationFailed(format!(
                "Unknown role: '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_creation() {
        let name = Username::new("alice_01").unwrap();
        assert_eq!(name.as_str(), "alice_01");
    }

    #[test]
    fn test_username_boundaries() {
        // Too short / minimum / maximum / too long
        assert!(Username::new("ab").is_err());
        assert!(Username::new("abc").is_ok());
        assert!(Username::new(&"a".repeat(20)).is_ok());
        assert!(Username::new(&"a".repeat(21)).is_err());
    }

    #[test]
    fn test_username_charset() {
        assert!(Username::new("alice_01").is_ok());
        assert!(Username::new("bad name").is_err());
        assert!(Username::new("bad-name").is_err());
        assert!(Username::new("").is_err());
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("user".parse::<Role>().unwrap(), Role::User);
        assert_eq!("analyst".parse::<Role>().unwrap(), Role::Analyst);
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert!("root".parse::<Role>().is_err());
        assert!("Admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_ordering() {
        assert!(Role::User.level() < Role::Analyst.level());
        assert!(Role::Analyst.level() < Role::Admin.level());
        assert_eq!(Role::default(), Role::User);
    }

    #[test]
    fn test_role_serde_names() {
        assert_eq!(serde_json::to_string(&Role::Analyst).unwrap(), "\"analyst\"");
        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, Role::Admin);
    }
}
