//! Login Use Case
//!
//! Verifies credentials and mints a session token.
//!
//! The failure checks run in a fixed order, each short-circuiting the
//! next, and each carries its own reason (a blank username reports
//! "account does not exist", an unknown one "username not found").

use std::sync::Arc;

use platform::password::RawPassword;

use crate::application::config::AccountsConfig;
use crate::application::token::{SessionClaims, TokenIssuer};
use crate::domain::entity::account::Account;
use crate::domain::repository::{AccountRepository, CredentialRepository, RoleRegistry};
use crate::domain::value_object::{role_name::RoleName, user_name::UserName};
use crate::error::{AccountError, AccountResult};

/// Login input
pub struct LoginInput {
    pub user_name: String,
    pub password: String,
}

/// Login output: signed token, public projection, success message
pub struct LoginOutput {
    pub token: String,
    pub account: Account,
    /// First assigned role, if any; the token claim collapses to this
    pub role: Option<RoleName>,
    pub message: String,
}

/// Login use case
pub struct LoginUseCase<R, C, G>
where
    R: AccountRepository,
    C: CredentialRepository,
    G: RoleRegistry,
{
    accounts: Arc<R>,
    credentials: Arc<C>,
    roles: Arc<G>,
    issuer: Arc<TokenIssuer>,
    config: Arc<AccountsConfig>,
}

impl<R, C, G> LoginUseCase<R, C, G>
where
    R: AccountRepository,
    C: CredentialRepository,
    G: RoleRegistry,
{
    pub fn new(
        accounts: Arc<R>,
        credentials: Arc<C>,
        roles: Arc<G>,
        issuer: Arc<TokenIssuer>,
        config: Arc<AccountsConfig>,
    ) -> Self {
        Self {
            accounts,
            credentials,
            roles,
            issuer,
            config,
        }
    }

    pub async fn execute(&self, input: LoginInput) -> AccountResult<LoginOutput> {
        // 1. Blank username
        if input.user_name.trim().is_empty() {
            return Err(AccountError::AccountNotFound);
        }

        // 2. Lookup by canonical username. A name that fails validation
        //    cannot name an account either.
        let user_name =
            UserName::new(&input.user_name).map_err(|_| AccountError::UserNameNotFound)?;

        let account = self
            .accounts
            .find_by_user_name(&user_name)
            .await?
            .ok_or(AccountError::UserNameNotFound)?;

        // 3. Blank password
        if input.password.trim().is_empty() {
            return Err(AccountError::PasswordRequired);
        }

        // 4. Verify against the stored hash
        let credential = self
            .credentials
            .find_by_account_id(&account.account_id)
            .await?
            .ok_or_else(|| AccountError::Internal("credential record missing".to_string()))?;

        let raw_password =
            RawPassword::new(input.password).map_err(|_| AccountError::InvalidCredentials)?;

        let password_hash = credential.password_hash.clone();
        let password_valid =
            tokio::task::spawn_blocking(move || password_hash.verify(&raw_password))
                .await
                .map_err(|e| AccountError::Internal(format!("verify task failed: {e}")))?;

        if !password_valid {
            return Err(AccountError::InvalidCredentials);
        }

        // First assigned role becomes the token's role claim
        let roles = self.roles.roles_for_account(&account.account_id).await?;
        let role = roles.into_iter().next();

        let claims = SessionClaims::new(
            &account.account_id,
            &account.user_name,
            role.as_ref(),
            self.config.token_ttl,
        );
        let token = self.issuer.issue(&claims)?;

        tracing::info!(
            account_id = %account.account_id,
            user_name = %account.user_name,
            "Account logged in"
        );

        Ok(LoginOutput {
            token,
            account,
            role,
            message: "login successful".to_string(),
        })
    }
}
