//! Unit tests for the accounts crate
//!
//! Use-case flows run against an in-memory store whose insert enforces
//! the canonical-user-name uniqueness guard atomically, mirroring the
//! database unique constraint.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use uuid::Uuid;

use crate::application::config::AccountsConfig;
use crate::application::login::{LoginInput, LoginUseCase};
use crate::application::register::{RegisterInput, RegisterUseCase};
use crate::application::token::{SigningSecret, TokenIssuer};
use crate::domain::entity::{account::Account, credential::Credential};
use crate::domain::repository::{AccountRepository, CredentialRepository, RoleRegistry};
use crate::domain::value_object::{
    account_id::AccountId, role_name::RoleName, user_name::UserName,
};
use crate::error::{AccountError, AccountResult};

// ============================================================================
// In-memory store
// ============================================================================

#[derive(Default)]
struct MemoryInner {
    accounts: Vec<Account>,
    credentials: HashMap<Uuid, Credential>,
    roles: HashSet<String>,
    links: Vec<(Uuid, String)>,
}

#[derive(Clone, Default)]
struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

impl AccountRepository for MemoryStore {
    async fn insert(
        &self,
        account: &Account,
        credential: &Credential,
        role: &RoleName,
    ) -> AccountResult<()> {
        let mut inner = self.inner.lock().unwrap();

        // The whole unit of work happens under one lock, so the
        // uniqueness check and the writes are atomic, as they are in the
        // database transaction.
        if inner
            .accounts
            .iter()
            .any(|a| a.user_name.canonical() == account.user_name.canonical())
        {
            return Err(AccountError::UserNameTaken);
        }

        inner.accounts.push(account.clone());
        inner
            .credentials
            .insert(*credential.account_id.as_uuid(), credential.clone());
        let link = (*account.account_id.as_uuid(), role.as_str().to_string());
        if !inner.links.contains(&link) {
            inner.links.push(link);
        }

        Ok(())
    }

    async fn find_by_id(&self, account_id: &AccountId) -> AccountResult<Option<Account>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .accounts
            .iter()
            .find(|a| a.account_id == *account_id)
            .cloned())
    }

    async fn find_by_user_name(&self, user_name: &UserName) -> AccountResult<Option<Account>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .accounts
            .iter()
            .find(|a| a.user_name.canonical() == user_name.canonical())
            .cloned())
    }

    async fn exists_by_user_name(&self, user_name: &UserName) -> AccountResult<bool> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .accounts
            .iter()
            .any(|a| a.user_name.canonical() == user_name.canonical()))
    }

    async fn list(&self) -> AccountResult<Vec<Account>> {
        let inner = self.inner.lock().unwrap();
        let mut accounts = inner.accounts.clone();
        accounts.sort_by(|a, b| a.user_name.canonical().cmp(b.user_name.canonical()));
        Ok(accounts)
    }
}

impl CredentialRepository for MemoryStore {
    async fn find_by_account_id(
        &self,
        account_id: &AccountId,
    ) -> AccountResult<Option<Credential>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.credentials.get(account_id.as_uuid()).cloned())
    }
}

impl RoleRegistry for MemoryStore {
    async fn ensure_role(&self, role: &RoleName) -> AccountResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.roles.insert(role.as_str().to_string());
        Ok(())
    }

    async fn assign_role(&self, account_id: &AccountId, role: &RoleName) -> AccountResult<()> {
        let mut inner = self.inner.lock().unwrap();
        let link = (*account_id.as_uuid(), role.as_str().to_string());
        if !inner.links.contains(&link) {
            inner.links.push(link);
        }
        Ok(())
    }

    async fn roles_for_account(&self, account_id: &AccountId) -> AccountResult<Vec<RoleName>> {
        let inner = self.inner.lock().unwrap();
        inner
            .links
            .iter()
            .filter(|(id, _)| id == account_id.as_uuid())
            .map(|(_, name)| {
                RoleName::new(name).map_err(|e| AccountError::Internal(e.to_string()))
            })
            .collect()
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn test_state() -> (Arc<MemoryStore>, Arc<AccountsConfig>, Arc<TokenIssuer>) {
    let store = Arc::new(MemoryStore::default());
    let config = Arc::new(AccountsConfig::default());
    let issuer = Arc::new(TokenIssuer::new(
        &SigningSecret::new("unit-test-signing-secret").unwrap(),
    ));
    (store, config, issuer)
}

fn register_use_case(
    store: &Arc<MemoryStore>,
    config: &Arc<AccountsConfig>,
) -> RegisterUseCase<MemoryStore, MemoryStore> {
    RegisterUseCase::new(store.clone(), store.clone(), config.clone())
}

fn login_use_case(
    store: &Arc<MemoryStore>,
    config: &Arc<AccountsConfig>,
    issuer: &Arc<TokenIssuer>,
) -> LoginUseCase<MemoryStore, MemoryStore, MemoryStore> {
    LoginUseCase::new(
        store.clone(),
        store.clone(),
        store.clone(),
        issuer.clone(),
        config.clone(),
    )
}

fn register_input(user_name: &str, password: &str) -> RegisterInput {
    RegisterInput {
        user_name: user_name.to_string(),
        password: password.to_string(),
        display_name: None,
        role: None,
    }
}

fn login_input(user_name: &str, password: &str) -> LoginInput {
    LoginInput {
        user_name: user_name.to_string(),
        password: password.to_string(),
    }
}

// ============================================================================
// Register
// ============================================================================

#[cfg(test)]
mod register_tests {
    use super::*;

    #[tokio::test]
    async fn register_defaults_to_user_role() {
        let (store, config, _) = test_state();

        let output = register_use_case(&store, &config)
            .execute(register_input("alice", "Secr3t!"))
            .await
            .unwrap();

        assert_eq!(output.account.user_name.original(), "alice");
        assert_eq!(output.role.as_str(), "User");

        let roles = store
            .roles_for_account(&output.account.account_id)
            .await
            .unwrap();
        assert_eq!(roles.len(), 1);
        assert_eq!(roles[0].as_str(), "User");
    }

    #[tokio::test]
    async fn register_with_explicit_role_creates_it() {
        let (store, config, _) = test_state();

        let output = register_use_case(&store, &config)
            .execute(RegisterInput {
                user_name: "bob".to_string(),
                password: "Secr3t!".to_string(),
                display_name: Some("Bob".to_string()),
                role: Some("Admin".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(output.role.as_str(), "Admin");
        assert!(store.inner.lock().unwrap().roles.contains("Admin"));
    }

    #[tokio::test]
    async fn register_rejects_blank_username() {
        let (store, config, _) = test_state();

        let result = register_use_case(&store, &config)
            .execute(register_input("   ", "Secr3t!"))
            .await;

        assert!(matches!(result, Err(AccountError::Validation(_))));
    }

    #[tokio::test]
    async fn register_rejects_blank_password() {
        let (store, config, _) = test_state();

        let result = register_use_case(&store, &config)
            .execute(register_input("alice", ""))
            .await;

        assert!(matches!(result, Err(AccountError::Validation(_))));
    }

    #[tokio::test]
    async fn register_rejects_taken_username() {
        let (store, config, _) = test_state();
        let use_case = register_use_case(&store, &config);

        use_case
            .execute(register_input("alice", "Secr3t!"))
            .await
            .unwrap();

        let result = use_case.execute(register_input("alice", "0ther!")).await;
        assert!(matches!(result, Err(AccountError::UserNameTaken)));
    }

    #[tokio::test]
    async fn register_uniqueness_ignores_case_and_whitespace() {
        let (store, config, _) = test_state();
        let use_case = register_use_case(&store, &config);

        use_case
            .execute(register_input("alice", "Secr3t!"))
            .await
            .unwrap();

        for variant in ["Alice", " ALICE ", "aLiCe"] {
            let result = use_case.execute(register_input(variant, "0ther!")).await;
            assert!(
                matches!(result, Err(AccountError::UserNameTaken)),
                "variant {variant:?} should conflict"
            );
        }

        assert_eq!(store.inner.lock().unwrap().accounts.len(), 1);
    }

    #[tokio::test]
    async fn register_never_exposes_credential() {
        let (store, config, _) = test_state();

        let output = register_use_case(&store, &config)
            .execute(register_input("alice", "Secr3t!"))
            .await
            .unwrap();

        // The stored credential is a hash, never the plaintext
        let credential = store
            .find_by_account_id(&output.account.account_id)
            .await
            .unwrap()
            .unwrap();
        assert!(!credential.password_hash.as_phc_string().contains("Secr3t!"));
    }

    #[tokio::test]
    async fn concurrent_registers_admit_exactly_one() {
        let (store, config, _) = test_state();

        let mut handles = Vec::new();
        for variant in ["dave", "Dave", "DAVE ", " dAvE", "dave ", "DAVe"] {
            let store = store.clone();
            let config = config.clone();
            handles.push(tokio::spawn(async move {
                register_use_case(&store, &config)
                    .execute(register_input(variant, "Secr3t!"))
                    .await
            }));
        }

        let mut successes = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(AccountError::UserNameTaken) => conflicts += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(conflicts, 5);
        assert_eq!(store.inner.lock().unwrap().accounts.len(), 1);
    }
}

// ============================================================================
// Login
// ============================================================================

#[cfg(test)]
mod login_tests {
    use super::*;
    use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

    use crate::application::token::SessionClaims;

    #[tokio::test]
    async fn register_then_login_round_trip() {
        let (store, config, issuer) = test_state();

        let registered = register_use_case(&store, &config)
            .execute(register_input("alice", "Secr3t!"))
            .await
            .unwrap();

        let output = login_use_case(&store, &config, &issuer)
            .execute(login_input("alice", "Secr3t!"))
            .await
            .unwrap();

        assert!(!output.token.is_empty());
        assert_eq!(output.account.account_id, registered.account.account_id);
        assert_eq!(output.message, "login successful");
    }

    #[tokio::test]
    async fn login_accepts_case_and_whitespace_variant() {
        let (store, config, issuer) = test_state();

        register_use_case(&store, &config)
            .execute(register_input("alice", "Secr3t!"))
            .await
            .unwrap();

        // "Alice " logs into the account registered as "alice"
        let output = login_use_case(&store, &config, &issuer)
            .execute(login_input("Alice ", "Secr3t!"))
            .await
            .unwrap();

        let decoded = decode::<SessionClaims>(
            &output.token,
            &DecodingKey::from_secret(b"unit-test-signing-secret"),
            &Validation::new(Algorithm::HS256),
        )
        .unwrap();

        assert_eq!(decoded.claims.username, "alice");
        assert_eq!(decoded.claims.role, "User");
        assert_eq!(decoded.claims.sub, output.account.account_id.to_string());
        // Absolute expiry, two days out
        assert_eq!(decoded.claims.exp - decoded.claims.iat, 172_800);
    }

    #[tokio::test]
    async fn login_blank_username_fails() {
        let (store, config, issuer) = test_state();

        let result = login_use_case(&store, &config, &issuer)
            .execute(login_input("  ", "Secr3t!"))
            .await;

        assert!(matches!(result, Err(AccountError::AccountNotFound)));
    }

    #[tokio::test]
    async fn login_unknown_username_fails() {
        let (store, config, issuer) = test_state();

        let result = login_use_case(&store, &config, &issuer)
            .execute(login_input("nobody", "Secr3t!"))
            .await;

        assert!(matches!(result, Err(AccountError::UserNameNotFound)));
    }

    #[tokio::test]
    async fn login_blank_password_fails() {
        let (store, config, issuer) = test_state();

        register_use_case(&store, &config)
            .execute(register_input("alice", "Secr3t!"))
            .await
            .unwrap();

        let result = login_use_case(&store, &config, &issuer)
            .execute(login_input("alice", ""))
            .await;

        assert!(matches!(result, Err(AccountError::PasswordRequired)));
    }

    #[tokio::test]
    async fn login_wrong_password_fails_without_token() {
        let (store, config, issuer) = test_state();

        register_use_case(&store, &config)
            .execute(register_input("alice", "Secr3t!"))
            .await
            .unwrap();

        let result = login_use_case(&store, &config, &issuer)
            .execute(login_input("alice", "wrong"))
            .await;

        assert!(matches!(result, Err(AccountError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn login_role_claim_uses_first_assigned_role() {
        let (store, config, issuer) = test_state();

        let registered = register_use_case(&store, &config)
            .execute(RegisterInput {
                user_name: "carol".to_string(),
                password: "Secr3t!".to_string(),
                display_name: None,
                role: Some("Admin".to_string()),
            })
            .await
            .unwrap();

        // A second role does not displace the first in the claim
        store
            .assign_role(
                &registered.account.account_id,
                &RoleName::new("Auditor").unwrap(),
            )
            .await
            .unwrap();

        let output = login_use_case(&store, &config, &issuer)
            .execute(login_input("carol", "Secr3t!"))
            .await
            .unwrap();

        assert_eq!(output.role.unwrap().as_str(), "Admin");
    }
}

// ============================================================================
// Role registry
// ============================================================================

#[cfg(test)]
mod role_registry_tests {
    use super::*;

    #[tokio::test]
    async fn ensure_role_is_idempotent() {
        let store = MemoryStore::default();
        let role = RoleName::new("Admin").unwrap();

        store.ensure_role(&role).await.unwrap();
        store.ensure_role(&role).await.unwrap();

        assert_eq!(store.inner.lock().unwrap().roles.len(), 1);
    }

    #[tokio::test]
    async fn assign_role_twice_links_once() {
        let store = MemoryStore::default();
        let role = RoleName::new("Admin").unwrap();
        let account_id = AccountId::new();

        store.assign_role(&account_id, &role).await.unwrap();
        store.assign_role(&account_id, &role).await.unwrap();

        let roles = store.roles_for_account(&account_id).await.unwrap();
        assert_eq!(roles.len(), 1);
    }
}
