//! In-memory store for running without a database
//!
//! Accounts and lists live in separate repositories, so this wrapper gives
//! them the cascade Postgres gets from its foreign keys: deleting an account
//! purges its list, and nothing can be listed for an account that is gone.

use std::sync::Arc;

use auth::domain::repository::{AccountRepository, RefreshTokenRepository};
use auth::domain::value_object::Email;
use auth::domain::{Account, NewAccount, RefreshRecord};
use auth::{AuthResult, InMemoryAuthRepository};
use chrono::{DateTime, Utc};
use kernel::id::{AccountId, MovieId};
use kinolist::InMemoryMovieListRepository;
use kinolist::domain::entry::{EntryPatch, ListEntry};
use kinolist::domain::repository::MovieListRepository;
use kinolist::{KinolistError, KinolistResult};
use tokio::sync::RwLock;

#[derive(Clone, Default)]
pub struct MemoryStore {
    accounts: InMemoryAuthRepository,
    list: InMemoryMovieListRepository,
    /// Held for writing while an account and its list are removed
    cascade: Arc<RwLock<()>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AccountRepository for MemoryStore {
    async fn create(&self, account: &NewAccount) -> AuthResult<AccountId> {
        self.accounts.create(account).await
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Account>> {
        self.accounts.find_by_email(email).await
    }

    async fn find_by_id(&self, id: AccountId) -> AuthResult<Option<Account>> {
        self.accounts.find_by_id(id).await
    }

    async fn update_last_login(&self, id: AccountId, at: DateTime<Utc>) -> AuthResult<()> {
        self.accounts.update_last_login(id, at).await
    }

    async fn delete(&self, id: AccountId) -> AuthResult<Option<Account>> {
        let _cascade = self.cascade.write().await;

        let removed = self.accounts.delete(id).await?;
        if removed.is_some() {
            let purged = self.list.purge_owner(id).await;
            tracing::debug!(account_id = %id, purged, "Removed list entries of deleted account");
        }
        Ok(removed)
    }
}

impl RefreshTokenRepository for MemoryStore {
    async fn upsert(&self, record: &RefreshRecord) -> AuthResult<()> {
        self.accounts.upsert(record).await
    }

    async fn replace(&self, current_digest: &str, next: &RefreshRecord) -> AuthResult<bool> {
        self.accounts.replace(current_digest, next).await
    }

    async fn remove(&self, token_digest: &str) -> AuthResult<bool> {
        self.accounts.remove(token_digest).await
    }
}

impl MovieListRepository for MemoryStore {
    async fn insert(&self, entry: &ListEntry) -> KinolistResult<()> {
        let _cascade = self.cascade.read().await;

        let owner = self
            .accounts
            .find_by_id(entry.owner)
            .await
            .map_err(|e| KinolistError::Internal(e.to_string()))?;
        if owner.is_none() {
            return Err(KinolistError::AccountGone);
        }
        self.list.insert(entry).await
    }

    async fn find_all(&self, owner: AccountId) -> KinolistResult<Vec<ListEntry>> {
        self.list.find_all(owner).await
    }

    async fn find(&self, owner: AccountId, movie_id: MovieId) -> KinolistResult<Option<ListEntry>> {
        self.list.find(owner, movie_id).await
    }

    async fn update(
        &self,
        owner: AccountId,
        movie_id: MovieId,
        patch: &EntryPatch,
        at: DateTime<Utc>,
    ) -> KinolistResult<Option<ListEntry>> {
        self.list.update(owner, movie_id, patch, at).await
    }

    async fn delete(
        &self,
        owner: AccountId,
        movie_id: MovieId,
    ) -> KinolistResult<Option<ListEntry>> {
        self.list.delete(owner, movie_id).await
    }
}
