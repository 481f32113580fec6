//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in the
//! infrastructure layer.

use crate::domain::entity::{account::Account, credential::Credential};
use crate::domain::value_object::{
    account_id::AccountId, role_name::RoleName, user_name::UserName,
};
use crate::error::AccountResult;

/// Account repository trait
///
/// `insert` is an atomic unit of work: account row, credential row and the
/// role link commit together or not at all, so no partial account is ever
/// visible to concurrent readers. The store's unique constraint on the
/// canonical user name is the authoritative uniqueness guard;
/// `exists_by_user_name` is a fast-path hint only.
#[trait_variant::make(AccountRepository: Send)]
pub trait LocalAccountRepository {
    /// Persist a new account with its credential and initial role link.
    /// A duplicate canonical user name surfaces as `UserNameTaken`.
    async fn insert(
        &self,
        account: &Account,
        credential: &Credential,
        role: &RoleName,
    ) -> AccountResult<()>;

    /// Find account by ID
    async fn find_by_id(&self, account_id: &AccountId) -> AccountResult<Option<Account>>;

    /// Find account by canonical user name
    async fn find_by_user_name(&self, user_name: &UserName) -> AccountResult<Option<Account>>;

    /// Check if a canonical user name is taken
    async fn exists_by_user_name(&self, user_name: &UserName) -> AccountResult<bool>;

    /// List all accounts, ordered by user name
    async fn list(&self) -> AccountResult<Vec<Account>>;
}

/// Credential repository trait
#[trait_variant::make(CredentialRepository: Send)]
pub trait LocalCredentialRepository {
    /// Find the credential for an account
    async fn find_by_account_id(
        &self,
        account_id: &AccountId,
    ) -> AccountResult<Option<Credential>>;
}

/// Role registry trait
///
/// Roles are created on first reference. Both writes are idempotent
/// insert-or-ignore at the store layer, so two registrations referencing
/// the same new role concurrently cannot error or duplicate it.
#[trait_variant::make(RoleRegistry: Send)]
pub trait LocalRoleRegistry {
    /// Create the role if it does not exist; no-op otherwise
    async fn ensure_role(&self, role: &RoleName) -> AccountResult<()>;

    /// Link an account to a role; no-op if already linked
    async fn assign_role(&self, account_id: &AccountId, role: &RoleName) -> AccountResult<()>;

    /// Roles assigned to an account, in assignment order
    async fn roles_for_account(&self, account_id: &AccountId) -> AccountResult<Vec<RoleName>>;
}
