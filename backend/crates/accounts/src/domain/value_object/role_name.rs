//! Role Name Value Object
//!
//! Roles are free string tags (e.g. "Admin", "User"). The registry
//! auto-creates a role the first time any registration references it, so
//! the only invariants live here: trimmed, non-empty, bounded length.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length for a role name (in characters)
pub const ROLE_NAME_MAX_LENGTH: usize = 64;

/// Role granted to accounts registered without an explicit role
pub const DEFAULT_ROLE: &str = "User";

/// Error returned when role name validation fails
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleNameError {
    /// Role name is empty after trimming
    Empty,

    /// Role name is too long
    TooLong { length: usize, max: usize },
}

impl fmt::Display for RoleNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "role name is required"),
            Self::TooLong { length, max } => {
                write!(f, "role name is too long ({length} chars, maximum {max})")
            }
        }
    }
}

impl std::error::Error for RoleNameError {}

/// Validated role name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleName(String);

impl RoleName {
    /// Validate a raw role name
    pub fn new(raw: impl AsRef<str>) -> Result<Self, RoleNameError> {
        let trimmed = raw.as_ref().trim();

        if trimmed.is_empty() {
            return Err(RoleNameError::Empty);
        }

        let char_count = trimmed.chars().count();
        if char_count > ROLE_NAME_MAX_LENGTH {
            return Err(RoleNameError::TooLong {
                length: char_count,
                max: ROLE_NAME_MAX_LENGTH,
            });
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RoleName {
    /// The default role granted at registration
    fn default() -> Self {
        Self(DEFAULT_ROLE.to_string())
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_name_trimmed() {
        let role = RoleName::new(" Admin ").unwrap();
        assert_eq!(role.as_str(), "Admin");
    }

    #[test]
    fn test_default_role() {
        assert_eq!(RoleName::default().as_str(), "User");
    }

    #[test]
    fn test_empty_rejected() {
        assert_eq!(RoleName::new("  "), Err(RoleNameError::Empty));
    }

    #[test]
    fn test_too_long_rejected() {
        let raw = "r".repeat(ROLE_NAME_MAX_LENGTH + 1);
        assert!(matches!(
            RoleName::new(raw),
            Err(RoleNameError::TooLong { .. })
        ));
    }
}
