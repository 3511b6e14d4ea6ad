//! Account Use Cases
//!
//! Read and delete an account by id.

use std::sync::Arc;

use kernel::id::AccountId;

use crate::application::config::AuthConfig;
use crate::application::deadline::within;
use crate::domain::entity::Account;
use crate::domain::repository::AccountRepository;
use crate::error::{AuthError, AuthResult};

/// Get account use case
pub struct GetAccountUseCase<A>
where
    A: AccountRepository,
{
    account_repo: Arc<A>,
    config: Arc<AuthConfig>,
}

impl<A> GetAccountUseCase<A>
where
    A: AccountRepository,
{
    pub fn new(account_repo: Arc<A>, config: Arc<AuthConfig>) -> Self {
        Self {
            account_repo,
            config,
        }
    }

    pub async fn execute(&self, id: AccountId) -> AuthResult<Account> {
        within(self.config.operation_timeout, "get_account", async {
            self.account_repo
                .find_by_id(id)
                .await?
                .ok_or(AuthError::AccountNotFound)
        })
        .await
    }
}

/// Delete account use case
pub struct DeleteAccountUseCase<A>
where
    A: AccountRepository,
{
    account_repo: Arc<A>,
    config: Arc<AuthConfig>,
}

impl<A> DeleteAccountUseCase<A>
where
    A: AccountRepository,
{
    pub fn new(account_repo: Arc<A>, config: Arc<AuthConfig>) -> Self {
        Self {
            account_repo,
            config,
        }
    }

    /// Fetch, then remove; returns the removed record
    pub async fn execute(&self, id: AccountId) -> AuthResult<Account> {
        within(self.config.operation_timeout, "delete_account", async {
            self.account_repo
                .find_by_id(id)
                .await?
                .ok_or(AuthError::AccountNotFound)?;

            let removed = self
                .account_repo
                .delete(id)
                .await?
                .ok_or(AuthError::AccountNotFound)?;

            tracing::info!(account_id = %id, "Account deleted");
            Ok(removed)
        })
        .await
    }
}
