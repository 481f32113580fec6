//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::domain::entity::account::Account;
use crate::domain::value_object::role_name::RoleName;

// ============================================================================
// Register
// ============================================================================

/// Register request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub user_name: String,
    pub password: String,
    pub display_name: Option<String>,
    /// Role to assign; defaults to "User" when absent
    pub role: Option<String>,
}

// ============================================================================
// Login
// ============================================================================

/// Login request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub user_name: String,
    pub password: String,
}

/// Login response: token plus the account's public projection
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub account: AccountResponse,
    pub message: String,
}

// ============================================================================
// Account projection
// ============================================================================

/// Public projection of an account. Never carries the credential.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub account_id: String,
    pub user_name: String,
    pub display_name: Option<String>,
    /// First assigned role, if any
    pub role: Option<String>,
}

impl AccountResponse {
    pub fn from_account(account: &Account, role: Option<&RoleName>) -> Self {
        Self {
            account_id: account.account_id.to_string(),
            user_name: account.user_name.original().to_string(),
            display_name: account.display_name.clone(),
            role: role.map(|r| r.as_str().to_string()),
        }
    }
}
