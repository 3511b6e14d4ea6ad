//! Sign Up Use Case
//!
//! Creates a new account.

use std::sync::Arc;

use kernel::id::AccountId;

use crate::application::config::AuthConfig;
use crate::application::deadline::{blocking, within};
use crate::domain::entity::NewAccount;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{Email, RawPassword, UserName, UserPassword};
use crate::error::{AuthError, AuthResult};

/// Sign up input
pub struct SignUpInput {
    pub user_name: String,
    pub email: String,
    pub password: String,
}

/// Sign up use case
pub struct SignUpUseCase<A>
where
    A: AccountRepository,
{
    account_repo: Arc<A>,
    config: Arc<AuthConfig>,
}

impl<A> SignUpUseCase<A>
where
    A: AccountRepository,
{
    pub fn new(account_repo: Arc<A>, config: Arc<AuthConfig>) -> Self {
        Self {
            account_repo,
            config,
        }
    }

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<AccountId> {
        within(self.config.operation_timeout, "sign_up", self.run(input)).await
    }

    async fn run(&self, input: SignUpInput) -> AuthResult<AccountId> {
        // Validation order: username, email, password. Nothing is persisted before all pass.
        let user_name = UserName::new(input.user_name).map_err(AuthError::Validation)?;
        let email = Email::new(input.email).map_err(AuthError::Validation)?;
        let raw_password = RawPassword::for_sign_up(input.password).map_err(AuthError::Validation)?;

        let params = self.config.password_hash;
        let pepper = self.config.password_pepper.clone();
        let password_hash = blocking(move || {
            UserPassword::from_raw(&raw_password, &params, pepper.as_deref())
        })
        .await?
        .map_err(|e| AuthError::Internal(e.to_string()))?;

        let account = NewAccount::new(user_name, email, password_hash);
        let id = self.account_repo.create(&account).await?;

        tracing::info!(
            account_id = %id,
            user_name = %account.user_name.as_str(),
            "Account signed up"
        );

        Ok(id)
    }
}
