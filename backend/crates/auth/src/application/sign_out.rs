//! Sign Out Use Case
//!
//! Removes the stored refresh record matching the presented token.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::deadline::within;
use crate::domain::entity::refresh_token::digest;
use crate::domain::repository::RefreshTokenRepository;
use crate::error::{AuthError, AuthResult};

/// Sign out use case
pub struct SignOutUseCase<R>
where
    R: RefreshTokenRepository,
{
    refresh_repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> SignOutUseCase<R>
where
    R: RefreshTokenRepository,
{
    pub fn new(refresh_repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self {
            refresh_repo,
            config,
        }
    }

    /// `AuthError::RefreshTokenNotFound` when nothing matched
    pub async fn execute(&self, refresh_token: &str) -> AuthResult<()> {
        within(self.config.operation_timeout, "sign_out", async {
            if self.refresh_repo.remove(&digest(refresh_token)).await? {
                tracing::info!("Account signed out");
                Ok(())
            } else {
                Err(AuthError::RefreshTokenNotFound)
            }
        })
        .await
    }
}
