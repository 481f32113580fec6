//! Credential Entity
//!
//! The hashed password credential for an account. Separated from Account
//! to isolate sensitive data; never serialized into any response.

use chrono::{DateTime, Utc};
use platform::password::PasswordHash;

use crate::domain::value_object::account_id::AccountId;

/// Credential entity
#[derive(Debug, Clone)]
pub struct Credential {
    /// Reference to the owning Account
    pub account_id: AccountId,
    /// Argon2id hash of the password, PHC string form
    pub password_hash: PasswordHash,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Credential {
    /// Create a credential for an account
    pub fn new(account_id: AccountId, password_hash: PasswordHash) -> Self {
        let now = Utc::now();
        Self {
            account_id,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }
}
