//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use kernel::id::AccountId;
use thiserror::Error;

use crate::domain::token::TokenError;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Message sent whenever a refresh token cannot rescue an expired session
pub const REFRESH_REJECTED_MESSAGE: &str = "token expiration date has passed";

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Input failed a shape or policy rule (username, email, password)
    #[error("{0}")]
    Validation(AppError),

    /// Wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Email already registered
    #[error("Email is already registered")]
    EmailTaken,

    #[error("Account not found")]
    AccountNotFound,

    /// No stored refresh record matches the presented token
    #[error("Refresh token not found")]
    RefreshTokenNotFound,

    /// `Authorization` header absent or not exactly `Bearer <token>`
    #[error("Authorization header must be 'Bearer <token>'")]
    MalformedAuthorizationHeader,

    /// Malformed token or signature mismatch
    #[error("Invalid token")]
    InvalidToken,

    /// Correctly signed but past its expiry
    #[error("Token has expired")]
    TokenExpired { subject: AccountId },

    /// Access token expired and no refresh cookie came with the request
    #[error("Refresh token is missing")]
    MissingRefreshToken,

    /// Refresh token invalid, for another subject, or no longer the stored one
    #[error("token expiration date has passed")]
    RefreshRejected,

    /// Authenticated, but the resource belongs to another account
    #[error("Access to another account is forbidden")]
    Forbidden,

    /// Operation exceeded its deadline
    #[error("Operation timed out")]
    Timeout,

    /// A protected handler ran without an identity attached
    #[error("Request identity is missing")]
    MissingIdentity,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(_)
            | AuthError::MissingRefreshToken
            | AuthError::RefreshRejected => ErrorKind::BadRequest,
            AuthError::InvalidCredentials
            | AuthError::MalformedAuthorizationHeader
            | AuthError::InvalidToken
            | AuthError::TokenExpired { .. } => ErrorKind::Unauthorized,
            AuthError::Forbidden => ErrorKind::Forbidden,
            AuthError::AccountNotFound | AuthError::RefreshTokenNotFound => ErrorKind::NotFound,
            AuthError::EmailTaken => ErrorKind::Conflict,
            AuthError::Timeout => ErrorKind::ServiceUnavailable,
            AuthError::MissingIdentity | AuthError::Database(_) | AuthError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        match self {
            AuthError::Validation(inner) => {
                let err = AppError::new(inner.kind(), inner.message().to_string());
                match inner.action() {
                    Some(action) => err.with_action(action.to_string()),
                    None => err,
                }
            }
            AuthError::TokenExpired { .. } | AuthError::RefreshRejected => {
                AppError::new(self.kind(), self.to_string()).with_action("Sign in again")
            }
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
            AuthError::MissingIdentity => {
                tracing::error!("Protected handler reached without an authenticated account");
            }
            AuthError::Timeout => {
                tracing::warn!("Auth operation timed out");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid sign-in attempt");
            }
            AuthError::InvalidToken | AuthError::RefreshRejected => {
                tracing::warn!(error = %self, "Rejected credentials");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Invalid => AuthError::InvalidToken,
            TokenError::Expired { subject } => AuthError::TokenExpired { subject },
            TokenError::Signing(msg) => AuthError::Internal(msg),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}
