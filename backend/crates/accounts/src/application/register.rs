//! Register Use Case
//!
//! Creates a new account: uniqueness check, password hash, role
//! resolution, atomic persist.

use std::sync::Arc;

use platform::password::RawPassword;

use crate::application::config::AccountsConfig;
use crate::domain::entity::{account::Account, credential::Credential};
use crate::domain::repository::{AccountRepository, RoleRegistry};
use crate::domain::value_object::{role_name::RoleName, user_name::UserName};
use crate::error::{AccountError, AccountResult};

/// Register input
pub struct RegisterInput {
    pub user_name: String,
    pub password: String,
    pub display_name: Option<String>,
    pub role: Option<String>,
}

/// Register output: the public projection of the new account.
/// The hashed credential never leaves the use case.
pub struct RegisterOutput {
    pub account: Account,
    pub role: RoleName,
}

/// Register use case
pub struct RegisterUseCase<R, G>
where
    R: AccountRepository,
    G: RoleRegistry,
{
    accounts: Arc<R>,
    roles: Arc<G>,
    config: Arc<AccountsConfig>,
}

impl<R, G> RegisterUseCase<R, G>
where
    R: AccountRepository,
    G: RoleRegistry,
{
    pub fn new(accounts: Arc<R>, roles: Arc<G>, config: Arc<AccountsConfig>) -> Self {
        Self {
            accounts,
            roles,
            config,
        }
    }

    pub async fn execute(&self, input: RegisterInput) -> AccountResult<RegisterOutput> {
        // Validate user name
        let user_name =
            UserName::new(&input.user_name).map_err(|e| AccountError::Validation(e.to_string()))?;

        // Validate password
        let raw_password =
            RawPassword::new(input.password).map_err(|e| AccountError::Validation(e.to_string()))?;

        // Fast-path uniqueness check. The unique index on the canonical
        // user name remains the authoritative guard at insert time.
        if self.accounts.exists_by_user_name(&user_name).await? {
            return Err(AccountError::UserNameTaken);
        }

        // Resolve role: requested, or the configured default
        let role = match input.role.as_deref() {
            Some(requested) => {
                RoleName::new(requested).map_err(|e| AccountError::Validation(e.to_string()))?
            }
            None => self.config.default_role.clone(),
        };

        // Hash off the async scheduler; Argon2id is CPU-bound
        let password_hash = tokio::task::spawn_blocking(move || raw_password.hash())
            .await
            .map_err(|e| AccountError::Internal(format!("hashing task failed: {e}")))?
            .map_err(|e| AccountError::Internal(e.to_string()))?;

        let account = Account::new(user_name, input.display_name);
        let credential = Credential::new(account.account_id, password_hash);

        // Role creation is idempotent and safe to run before the commit;
        // account, credential and role link then persist as one unit.
        self.roles.ensure_role(&role).await?;
        self.accounts.insert(&account, &credential, &role).await?;

        tracing::info!(
            account_id = %account.account_id,
            user_name = %account.user_name,
            role = %role,
            "Account registered"
        );

        Ok(RegisterOutput { account, role })
    }
}
