//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, token codec, repository traits
//! - `application/` - Use cases and configuration
//! - `infra/` - PostgreSQL and in-memory repositories
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! ## Features
//! - Sign-up with username + email + password
//! - Sign-in by email, issuing an access/refresh token pair
//! - Transparent rotation when the access token has expired
//! - Idempotent sign-out
//! - Account read/delete for the owner only
//!
//! ## Security Model
//! - Passwords hashed with Argon2id (configurable cost, optional pepper)
//! - Access and refresh tokens are HMAC-SHA256 signed with separate keys
//! - Refresh token travels only in an HttpOnly, path-scoped cookie
//! - One refresh token per account, stored as a SHA-256 digest

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use infra::{InMemoryAuthRepository, PgAuthRepository};
pub use presentation::middleware::{AuthMiddlewareState, AuthenticatedAccount, require_auth};
pub use presentation::router::{auth_router, auth_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
