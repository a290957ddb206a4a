//! Role-hierarchy permission checks
//!
//! Pure functions over role names; token claims and callers traffic in role
//! strings, so the check accepts arbitrary input and maps unknown names to
//! level 0 (always denied).

use crate::Role;
use std::str::FromStr;

/// Numeric privilege level for a role name; unknown names map to 0
pub fn role_level(role: &str) -> u8 {
    Role::from_str(role).map(Role::level).unwrap_or(0)
}

/// True iff `user_role` is at least as privileged as `required_role`
pub fn has_permission(user_role: &str, required_role: &str) -> bool {
    role_level(user_role) >= role_level(required_role)
}
