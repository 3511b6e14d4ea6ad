//! Update Tokens Use Case
//!
//! Rotation: exchange a still-stored refresh token for a fresh pair.
//! Only the auth middleware calls this.

use std::sync::Arc;

use chrono::Utc;
use kernel::id::AccountId;

use crate::application::config::AuthConfig;
use crate::application::deadline::within;
use crate::domain::entity::{RefreshRecord, refresh_token::digest};
use crate::domain::repository::RefreshTokenRepository;
use crate::domain::token::TokenPair;
use crate::error::{AuthError, AuthResult};

/// Update tokens use case
pub struct UpdateTokensUseCase<R>
where
    R: RefreshTokenRepository,
{
    refresh_repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> UpdateTokensUseCase<R>
where
    R: RefreshTokenRepository,
{
    pub fn new(refresh_repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self {
            refresh_repo,
            config,
        }
    }

    /// Issue a fresh pair for `subject` and swap it in for `presented_refresh`
    ///
    /// The swap succeeds only while `presented_refresh` is the account's stored
    /// token, so a signed-out or already-rotated token yields
    /// `AuthError::RefreshRejected` and nothing is issued.
    pub async fn execute(
        &self,
        subject: AccountId,
        presented_refresh: &str,
    ) -> AuthResult<TokenPair> {
        within(self.config.operation_timeout, "update_tokens", async {
            let pair = self
                .config
                .token_codec()
                .issue_pair_at(subject, Utc::now().timestamp_millis())?;
            let next = RefreshRecord::for_pair(&pair);

            if !self
                .refresh_repo
                .replace(&digest(presented_refresh), &next)
                .await?
            {
                tracing::warn!(account_id = %subject, "Refresh token is no longer current");
                return Err(AuthError::RefreshRejected);
            }

            tracing::info!(account_id = %subject, "Tokens rotated");
            Ok(pair)
        })
        .await
    }
}
