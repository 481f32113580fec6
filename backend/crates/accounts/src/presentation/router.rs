//! Accounts Router

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::AccountsConfig;
use crate::application::token::TokenIssuer;
use crate::domain::repository::{AccountRepository, CredentialRepository, RoleRegistry};
use crate::infra::postgres::PgAccountStore;
use crate::presentation::handlers::{self, AccountsAppState};

/// Create the accounts router with the PostgreSQL store
pub fn accounts_router(
    repo: PgAccountStore,
    issuer: TokenIssuer,
    config: AccountsConfig,
) -> Router {
    accounts_router_generic(repo, issuer, config)
}

/// Create a generic accounts router for any repository implementation
pub fn accounts_router_generic<R>(repo: R, issuer: TokenIssuer, config: AccountsConfig) -> Router
where
    R: AccountRepository + CredentialRepository + RoleRegistry + Clone + Send + Sync + 'static,
{
    let state = AccountsAppState {
        repo: Arc::new(repo),
        issuer: Arc::new(issuer),
        config: Arc::new(config),
    };

    Router::new()
        .route("/register", post(handlers::register::<R>))
        .route("/login", post(handlers::login::<R>))
        .route("/", get(handlers::list_accounts::<R>))
        .route("/{id}", get(handlers::get_account::<R>))
        .with_state(state)
}
