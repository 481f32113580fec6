//! Application Configuration
//!
//! Configuration for the accounts application layer. The token signing
//! secret is NOT part of this struct: it is validated separately into a
//! [`crate::application::token::SigningSecret`] and injected into the
//! issuer, so it can never be read from ambient state.

use std::time::Duration;

use crate::domain::value_object::role_name::RoleName;

/// Accounts application configuration
#[derive(Debug, Clone)]
pub struct AccountsConfig {
    /// Absolute session token lifetime (2 days)
    pub token_ttl: Duration,
    /// Role granted when registration names none
    pub default_role: RoleName,
}

impl Default for AccountsConfig {
    fn default() -> Self {
        Self {
            token_ttl: Duration::from_secs(2 * 24 * 3600), // 2 days
            default_role: RoleName::default(),
        }
    }
}

impl AccountsConfig {
    /// Token TTL in whole seconds
    pub fn token_ttl_secs(&self) -> i64 {
        self.token_ttl.as_secs() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AccountsConfig::default();
        assert_eq!(config.token_ttl, Duration::from_secs(172_800));
        assert_eq!(config.default_role.as_str(), "User");
    }
}
