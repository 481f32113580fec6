//! HTTP Handlers

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use std::sync::Arc;

use crate::application::config::AccountsConfig;
use crate::application::token::TokenIssuer;
use crate::application::{
    LoginInput, LoginUseCase, RegisterInput, RegisterUseCase,
};
use crate::domain::repository::{AccountRepository, CredentialRepository, RoleRegistry};
use crate::domain::value_object::account_id::AccountId;
use crate::error::{AccountError, AccountResult};
use crate::presentation::dto::{AccountResponse, LoginRequest, LoginResponse, RegisterRequest};

/// Shared state for account handlers
#[derive(Clone)]
pub struct AccountsAppState<R>
where
    R: AccountRepository + CredentialRepository + RoleRegistry + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub issuer: Arc<TokenIssuer>,
    pub config: Arc<AccountsConfig>,
}

// ============================================================================
// Register
// ============================================================================

/// POST /api/accounts/register
pub async fn register<R>(
    State(state): State<AccountsAppState<R>>,
    Json(req): Json<RegisterRequest>,
) -> AccountResult<impl IntoResponse>
where
    R: AccountRepository + CredentialRepository + RoleRegistry + Clone + Send + Sync + 'static,
{
    let use_case = RegisterUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    let input = RegisterInput {
        user_name: req.user_name,
        password: req.password,
        display_name: req.display_name,
        role: req.role,
    };

    let output = use_case.execute(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(AccountResponse::from_account(&output.account, Some(&output.role))),
    ))
}

// ============================================================================
// Login
// ============================================================================

/// POST /api/accounts/login
pub async fn login<R>(
    State(state): State<AccountsAppState<R>>,
    Json(req): Json<LoginRequest>,
) -> AccountResult<Json<LoginResponse>>
where
    R: AccountRepository + CredentialRepository + RoleRegistry + Clone + Send + Sync + 'static,
{
    let use_case = LoginUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.repo.clone(),
        state.issuer.clone(),
        state.config.clone(),
    );

    let input = LoginInput {
        user_name: req.user_name,
        password: req.password,
    };

    let output = use_case.execute(input).await?;

    Ok(Json(LoginResponse {
        token: output.token,
        account: AccountResponse::from_account(&output.account, output.role.as_ref()),
        message: output.message,
    }))
}

// ============================================================================
// Account reads
// ============================================================================

/// GET /api/accounts/{id}
pub async fn get_account<R>(
    State(state): State<AccountsAppState<R>>,
    Path(id): Path<String>,
) -> AccountResult<Json<AccountResponse>>
where
    R: AccountRepository + CredentialRepository + RoleRegistry + Clone + Send + Sync + 'static,
{
    let account_id: AccountId = id
        .parse()
        .map_err(|_| AccountError::Validation("invalid account id".to_string()))?;

    let account = state
        .repo
        .find_by_id(&account_id)
        .await?
        .ok_or(AccountError::NotFound)?;

    let roles = state.repo.roles_for_account(&account.account_id).await?;

    Ok(Json(AccountResponse::from_account(
        &account,
        roles.first(),
    )))
}

/// GET /api/accounts
pub async fn list_accounts<R>(
    State(state): State<AccountsAppState<R>>,
) -> AccountResult<Json<Vec<AccountResponse>>>
where
    R: AccountRepository + CredentialRepository + RoleRegistry + Clone + Send + Sync + 'static,
{
    let accounts = state.repo.list().await?;

    let mut responses = Vec::with_capacity(accounts.len());
    for account in &accounts {
        let roles = state.repo.roles_for_account(&account.account_id).await?;
        responses.push(AccountResponse::from_account(account, roles.first()));
    }

    Ok(Json(responses))
}
