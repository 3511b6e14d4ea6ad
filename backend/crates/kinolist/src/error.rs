//! Kinolist Error Types
//!
//! Movie-list error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Kinolist result type alias
pub type KinolistResult<T> = Result<T, KinolistError>;

/// Kinolist error variants
#[derive(Debug, Error)]
pub enum KinolistError {
    /// Title, status, score or patch shape rejected
    #[error("{0}")]
    Validation(AppError),

    /// The caller's list has no entry for this movie
    #[error("Movie is not in the list")]
    NotListed,

    /// The catalog has nothing for the title or id
    #[error("No movie found in the catalog")]
    NotInCatalog,

    #[error("Movie is already in the list")]
    AlreadyListed,

    /// The list owner's account was deleted after the token was issued
    #[error("Account no longer exists")]
    AccountGone,

    /// Catalog unreachable, or it answered with something unusable
    #[error("Movie catalog error: {0}")]
    Catalog(String),

    /// Operation exceeded its deadline
    #[error("Operation timed out")]
    Timeout,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl KinolistError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            KinolistError::Validation(inner) => inner.kind(),
            KinolistError::NotListed | KinolistError::NotInCatalog => ErrorKind::NotFound,
            KinolistError::AlreadyListed => ErrorKind::Conflict,
            KinolistError::AccountGone => ErrorKind::Unauthorized,
            KinolistError::Catalog(_) => ErrorKind::BadGateway,
            KinolistError::Timeout => ErrorKind::ServiceUnavailable,
            KinolistError::Database(_) | KinolistError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        match self {
            KinolistError::Validation(inner) => {
                let err = AppError::new(inner.kind(), inner.message().to_string());
                match inner.action() {
                    Some(action) => err.with_action(action.to_string()),
                    None => err,
                }
            }
            KinolistError::NotInCatalog => AppError::new(self.kind(), self.to_string())
                .with_action("Check the title spelling"),
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    fn log(&self) {
        match self {
            KinolistError::Database(e) => {
                tracing::error!(error = %e, "Kinolist database error");
            }
            KinolistError::Internal(msg) => {
                tracing::error!(message = %msg, "Kinolist internal error");
            }
            KinolistError::Catalog(msg) => {
                tracing::error!(message = %msg, "Movie catalog failure");
            }
            KinolistError::Timeout => {
                tracing::warn!("Kinolist operation timed out");
            }
            _ => {
                tracing::debug!(error = %self, "Kinolist error");
            }
        }
    }
}

impl From<reqwest::Error> for KinolistError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            KinolistError::Timeout
        } else {
            KinolistError::Catalog(err.to_string())
        }
    }
}

impl IntoResponse for KinolistError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}
