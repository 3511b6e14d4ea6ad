//! Sign In Use Case
//!
//! Verifies credentials and issues a token pair.

use std::sync::Arc;

use chrono::Utc;
use platform::password::PasswordHashError;

use crate::application::config::AuthConfig;
use crate::application::deadline::{blocking, within};
use crate::domain::entity::RefreshRecord;
use crate::domain::repository::{AccountRepository, RefreshTokenRepository};
use crate::domain::token::TokenPair;
use crate::domain::value_object::{Email, RawPassword};
use crate::error::{AuthError, AuthResult};

/// Sign in input
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Sign in use case
pub struct SignInUseCase<A, R>
where
    A: AccountRepository,
    R: RefreshTokenRepository,
{
    account_repo: Arc<A>,
    refresh_repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<A, R> SignInUseCase<A, R>
where
    A: AccountRepository,
    R: RefreshTokenRepository,
{
    pub fn new(account_repo: Arc<A>, refresh_repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self {
            account_repo,
            refresh_repo,
            config,
        }
    }

    pub async fn execute(&self, input: SignInInput) -> AuthResult<TokenPair> {
        within(self.config.operation_timeout, "sign_in", self.run(input)).await
    }

    async fn run(&self, input: SignInInput) -> AuthResult<TokenPair> {
        let email = Email::new(input.email).map_err(AuthError::Validation)?;
        let raw_password = RawPassword::new(input.password).map_err(AuthError::Validation)?;

        let account = self
            .account_repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        let stored = account.password_hash.clone();
        let pepper = self.config.password_pepper.clone();
        let verified = blocking(move || stored.verify(&raw_password, pepper.as_deref())).await?;

        match verified {
            Ok(()) => {}
            Err(PasswordHashError::Mismatch) => {
                tracing::warn!(account_id = %account.id, "Wrong password");
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => return Err(AuthError::Internal(e.to_string())),
        }

        let now = Utc::now();
        let pair = self
            .config
            .token_codec()
            .issue_pair_at(account.id, now.timestamp_millis())?;
        let record = RefreshRecord::for_pair(&pair);

        // Independent side effects; the first failure wins
        tokio::try_join!(
            self.account_repo.update_last_login(account.id, now),
            self.refresh_repo.upsert(&record),
        )?;

        tracing::info!(account_id = %account.id, "Account signed in");

        Ok(pair)
    }
}
