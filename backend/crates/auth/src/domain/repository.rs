//! Repository Traits
//!
//! Interfaces for data persistence. Implementations are in the infrastructure layer.

use chrono::{DateTime, Utc};
use kernel::id::AccountId;

use crate::domain::entity::{Account, NewAccount, RefreshRecord};
use crate::domain::value_object::Email;
use crate::error::AuthResult;

/// Account repository trait
#[trait_variant::make(AccountRepository: Send)]
pub trait LocalAccountRepository {
    /// Insert and return the assigned id. `AuthError::EmailTaken` on a duplicate email.
    async fn create(&self, account: &NewAccount) -> AuthResult<AccountId>;

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Account>>;

    async fn find_by_id(&self, id: AccountId) -> AuthResult<Option<Account>>;

    async fn update_last_login(&self, id: AccountId, at: DateTime<Utc>) -> AuthResult<()>;

    /// Remove the account (and, by cascade, its refresh record). Returns what was removed.
    async fn delete(&self, id: AccountId) -> AuthResult<Option<Account>>;
}

/// Refresh token repository trait
///
/// Holds at most one record per account.
#[trait_variant::make(RefreshTokenRepository: Send)]
pub trait LocalRefreshTokenRepository {
    /// Insert or overwrite the account's record
    async fn upsert(&self, record: &RefreshRecord) -> AuthResult<()>;

    /// Overwrite the account's record only if it still holds `current_digest`.
    /// Returns `false` when it does not (signed out, or rotated elsewhere).
    async fn replace(&self, current_digest: &str, next: &RefreshRecord) -> AuthResult<bool>;

    /// Delete the record holding `token_digest`. Returns `false` if there was none.
    async fn remove(&self, token_digest: &str) -> AuthResult<bool>;
}
