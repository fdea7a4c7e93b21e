//! Auth Error Types
//!
//! The closed set of failures this core can produce. Each variant maps
//! to a `kernel::ErrorKind` and an HTTP status; the HTTP layer never
//! constructs response bodies itself, it only converts these.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed email / password / task input, with one reason per
    /// failed rule
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Duplicate email at registration
    #[error("Email is already registered")]
    AlreadyExists,

    /// Wrong email or password. Deliberately indistinguishable: an
    /// unknown email must not read differently from a wrong password.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Login blocked by an active lockout. Distinct from
    /// `InvalidCredentials` so clients can show a different message.
    #[error("Account is temporarily locked")]
    AccountLocked,

    /// Missing, invalid, expired, or revoked token
    #[error("Authentication required")]
    Unauthorized,

    /// Valid identity, insufficient role
    #[error("Insufficient permissions")]
    Forbidden,

    /// Referenced resource is absent
    #[error("Resource not found")]
    NotFound,

    /// Malformed ID shape
    #[error("Invalid reference")]
    InvalidReference,

    /// Database error (infrastructure, never mapped to a domain kind)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::AlreadyExists => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::AccountLocked => StatusCode::LOCKED,
            AuthError::Unauthorized => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::NotFound => StatusCode::NOT_FOUND,
            AuthError::InvalidReference => StatusCode::BAD_REQUEST,
            AuthError::Database(_) | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(_) | AuthError::AlreadyExists | AuthError::InvalidReference => {
                ErrorKind::BadRequest
            }
            AuthError::InvalidCredentials | AuthError::Unauthorized => ErrorKind::Unauthorized,
            AuthError::AccountLocked => ErrorKind::Locked,
            AuthError::Forbidden => ErrorKind::Forbidden,
            AuthError::NotFound => ErrorKind::NotFound,
            AuthError::Database(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::AccountLocked => {
                tracing::warn!("Login attempt on locked account");
            }
            AuthError::Unauthorized => {
                tracing::debug!("Rejected request without valid credentials");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::BadRequest => AuthError::Validation(vec![err.message().to_string()]),
            ErrorKind::NotFound => AuthError::NotFound,
            _ => AuthError::Internal(err.to_string()),
        }
    }
}
