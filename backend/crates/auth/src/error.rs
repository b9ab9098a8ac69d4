//! Auth Error Types
//!
//! Auth-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Message returned for every server-side failure
const INTERNAL_MESSAGE: &str = "Internal server error";

/// Coarse classification shared by all auth failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Unauthenticated,
    Unauthorized,
    NotFound,
    Conflict,
    InvalidOrExpiredToken,
    InternalFailure,
}

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed input (body, identifier, password policy, ...)
    #[error("{}", .0.message())]
    Validation(AppError),

    /// No `Authorization` header
    #[error("Authorization token required")]
    MissingCredential,

    /// `Authorization` header is not `Bearer <token>`
    #[error("Authorization format must be Bearer <token>")]
    MalformedCredential,

    /// Token unknown, revoked, or its lookup failed
    #[error("Invalid or expired token")]
    SessionInvalid,

    /// Token found but past its expiry
    #[error("Token expired")]
    SessionExpired,

    /// Unknown email or wrong password
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("user not found")]
    UserNotFound,

    #[error("email not found")]
    EmailNotFound,

    #[error("user already exists")]
    UserAlreadyExists,

    #[error("invalid or expired reset token")]
    InvalidOrExpiredResetToken,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AuthError::Validation(_) => ErrorCategory::Validation,
            AuthError::MissingCredential
            | AuthError::MalformedCredential
            | AuthError::SessionInvalid
            | AuthError::SessionExpired => ErrorCategory::Unauthenticated,
            AuthError::InvalidCredentials => ErrorCategory::Unauthorized,
            AuthError::UserNotFound | AuthError::EmailNotFound => ErrorCategory::NotFound,
            AuthError::UserAlreadyExists => ErrorCategory::Conflict,
            AuthError::InvalidOrExpiredResetToken => ErrorCategory::InvalidOrExpiredToken,
            AuthError::Database(_) | AuthError::Internal(_) => ErrorCategory::InternalFailure,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self.category() {
            ErrorCategory::Validation | ErrorCategory::InvalidOrExpiredToken => {
                ErrorKind::BadRequest
            }
            ErrorCategory::Unauthenticated | ErrorCategory::Unauthorized => {
                ErrorKind::Unauthorized
            }
            ErrorCategory::NotFound => ErrorKind::NotFound,
            ErrorCategory::Conflict => ErrorKind::Conflict,
            ErrorCategory::InternalFailure => ErrorKind::InternalServerError,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Convert to AppError. Server-side details never leave the process.
    pub fn to_app_error(&self) -> AppError {
        match self {
            AuthError::Validation(inner) => {
                let err = AppError::new(inner.kind(), inner.message().to_string());
                match inner.action() {
                    Some(action) => err.with_action(action.to_string()),
                    None => err,
                }
            }
            AuthError::Database(_) | AuthError::Internal(_) => AppError::internal(INTERNAL_MESSAGE),
            _ => AppError::new(self.kind(), self.to_string()),
        }
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
            AuthError::InvalidOrExpiredResetToken => {
                tracing::warn!("Password reset attempted with invalid or expired token");
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
        if err.is_server_error() {
            AuthError::Internal(err.to_string())
        } else {
            AuthError::Validation(err)
        }
    }
}

impl From<JsonRejection> for AuthError {
    fn from(rejection: JsonRejection) -> Self {
        AuthError::Validation(AppError::bad_request(format!(
            "Invalid request: {}",
            rejection.body_text()
        )))
    }
}

impl From<PathRejection> for AuthError {
    fn from(rejection: PathRejection) -> Self {
        AuthError::Validation(AppError::bad_request(rejection.body_text()))
    }
}

impl From<kernel::id::IdParseError> for AuthError {
    fn from(err: kernel::id::IdParseError) -> Self {
        AuthError::Validation(err.into())
    }
}
