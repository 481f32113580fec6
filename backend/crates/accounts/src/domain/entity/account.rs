//! Account Entity
//!
//! Public account profile. The hashed credential lives in the separate
//! Credential entity so it never travels with the public projection.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{account_id::AccountId, user_name::UserName};

/// Account entity
#[derive(Debug, Clone)]
pub struct Account {
    /// Internal UUID identifier, assigned at creation, immutable
    pub account_id: AccountId,
    /// User name (unique on its canonical form)
    pub user_name: UserName,
    /// Free-form display name
    pub display_name: Option<String>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account
    pub fn new(user_name: UserName, display_name: Option<String>) -> Self {
        let now = Utc::now();

        Self {
            account_id: AccountId::new(),
            user_name,
            display_name,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_account_gets_fresh_id() {
        let a = Account::new(UserName::new("alice").unwrap(), None);
        let b = Account::new(UserName::new("alice").unwrap(), None);
        assert_ne!(a.account_id, b.account_id);
    }

    #[test]
    fn test_display_name_is_optional() {
        let account = Account::new(
            UserName::new("alice").unwrap(),
            Some("Alice Liddell".to_string()),
        );
        assert_eq!(account.display_name.as_deref(), Some("Alice Liddell"));
    }
}
