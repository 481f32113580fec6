//! Accounts Error Types
//!
//! This module provides account-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.
//!
//! Login failures deliberately keep the wording the checks produce
//! ("username not found" vs "invalid credentials"); all of them map to the
//! same 401 so the HTTP surface stays uniform.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Account-specific result type alias
pub type AccountResult<T> = Result<T, AccountError>;

/// Account-specific error variants
#[derive(Debug, Error)]
pub enum AccountError {
    /// Missing or malformed input (empty username/password, bad field)
    #[error("{0}")]
    Validation(String),

    /// User name already taken (normalized comparison)
    #[error("username already exists")]
    UserNameTaken,

    /// Login with a blank username
    #[error("account does not exist")]
    AccountNotFound,

    /// Login username has no matching account
    #[error("username not found")]
    UserNameNotFound,

    /// Login with a blank password
    #[error("password required")]
    PasswordRequired,

    /// Password verification failed
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Account lookup by ID found nothing
    #[error("account not found")]
    NotFound,

    /// Missing or blank signing secret; startup-fatal
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Database error
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl AccountError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AccountError::Validation(_) => StatusCode::BAD_REQUEST,
            AccountError::UserNameTaken => StatusCode::CONFLICT,
            AccountError::AccountNotFound
            | AccountError::UserNameNotFound
            | AccountError::PasswordRequired
            | AccountError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AccountError::NotFound => StatusCode::NOT_FOUND,
            AccountError::Configuration(_)
            | AccountError::Database(_)
            | AccountError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AccountError::Validation(_) => ErrorKind::BadRequest,
            AccountError::UserNameTaken => ErrorKind::Conflict,
            AccountError::AccountNotFound
            | AccountError::UserNameNotFound
            | AccountError::PasswordRequired
            | AccountError::InvalidCredentials => ErrorKind::Unauthorized,
            AccountError::NotFound => ErrorKind::NotFound,
            AccountError::Configuration(_)
            | AccountError::Database(_)
            | AccountError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AccountError::Database(e) => {
                tracing::error!(error = %e, "Account database error");
            }
            AccountError::Internal(msg) => {
                tracing::error!(message = %msg, "Account internal error");
            }
            AccountError::Configuration(msg) => {
                tracing::error!(message = %msg, "Account configuration error");
            }
            AccountError::InvalidCredentials | AccountError::PasswordRequired => {
                tracing::warn!("Invalid login attempt");
            }
            _ => {
                tracing::debug!(error = %self, "Account error");
            }
        }
    }
}

impl IntoResponse for AccountError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AccountError {
    fn from(err: AppError) -> Self {
        AccountError::Internal(err.to_string())
    }
}
