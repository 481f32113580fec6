//! Accounts Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Account registration with username + password
//! - Login with signed, time-bounded session tokens (JWT, HS256)
//! - Role assignment with auto-created roles, default "User"
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, fresh salt per hash
//! - Usernames unique on their canonical form (trimmed, case-folded),
//!   enforced by a store-level unique constraint
//! - Token signing secret injected at startup; boot fails without it
//! - Tokens are issued here only; verification belongs to the request
//!   authorization layer

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::AccountsConfig;
pub use application::token::{SessionClaims, SigningSecret, TokenIssuer};
pub use error::{AccountError, AccountResult};
pub use infra::postgres::PgAccountStore;
pub use presentation::router::accounts_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod store {
    pub use crate::infra::postgres::PgAccountStore as AccountStore;
}

pub mod router {
    pub use crate::presentation::router::*;
}
