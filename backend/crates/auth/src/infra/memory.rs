//! In-Memory Repository Implementations
//!
//! Same contracts as the PostgreSQL repository, for tests and for running
//! without a database. State lives behind one `RwLock` so the account
//! cascade and the refresh compare-and-swap are atomic.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use kernel::id::AccountId;
use tokio::sync::RwLock;

use crate::domain::entity::{Account, NewAccount, RefreshRecord};
use crate::domain::repository::{AccountRepository, RefreshTokenRepository};
use crate::domain::value_object::Email;
use crate::error::{AuthError, AuthResult};

#[derive(Default)]
struct State {
    next_id: i64,
    accounts: HashMap<AccountId, Account>,
    /// Keyed by account: one record per account
    refresh_tokens: HashMap<AccountId, RefreshRecord>,
}

/// In-memory auth repository
#[derive(Clone, Default)]
pub struct InMemoryAuthRepository {
    state: Arc<RwLock<State>>,
}

impl InMemoryAuthRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored refresh record for an account
    pub async fn refresh_record(&self, id: AccountId) -> Option<RefreshRecord> {
        self.state.read().await.refresh_tokens.get(&id).cloned()
    }
}

impl AccountRepository for InMemoryAuthRepository {
    async fn create(&self, account: &NewAccount) -> AuthResult<AccountId> {
        let mut state = self.state.write().await;

        if state.accounts.values().any(|a| a.email == account.email) {
            return Err(AuthError::EmailTaken);
        }

        state.next_id += 1;
        let id = AccountId::new(state.next_id);
        state.accounts.insert(id, account.clone().into_account(id));

        Ok(id)
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Account>> {
        let state = self.state.read().await;
        Ok(state.accounts.values().find(|a| &a.email == email).cloned())
    }

    async fn find_by_id(&self, id: AccountId) -> AuthResult<Option<Account>> {
        Ok(self.state.read().await.accounts.get(&id).cloned())
    }

    async fn update_last_login(&self, id: AccountId, at: DateTime<Utc>) -> AuthResult<()> {
        if let Some(account) = self.state.write().await.accounts.get_mut(&id) {
            account.last_login_at = at;
        }
        Ok(())
    }

    async fn delete(&self, id: AccountId) -> AuthResult<Option<Account>> {
        let mut state = self.state.write().await;
        let removed = state.accounts.remove(&id);
        if removed.is_some() {
            state.refresh_tokens.remove(&id);
        }
        Ok(removed)
    }
}

impl RefreshTokenRepository for InMemoryAuthRepository {
    async fn upsert(&self, record: &RefreshRecord) -> AuthResult<()> {
        let mut state = self.state.write().await;
        // token_digest is unique across accounts
        state
            .refresh_tokens
            .retain(|id, r| *id == record.account_id || r.token_digest != record.token_digest);
        state.refresh_tokens.insert(record.account_id, record.clone());
        Ok(())
    }

    async fn replace(&self, current_digest: &str, next: &RefreshRecord) -> AuthResult<bool> {
        let mut state = self.state.write().await;
        match state.refresh_tokens.get_mut(&next.account_id) {
            Some(stored) if stored.token_digest == current_digest => {
                *stored = next.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn remove(&self, token_digest: &str) -> AuthResult<bool> {
        let mut state = self.state.write().await;
        let before = state.refresh_tokens.len();
        state
            .refresh_tokens
            .retain(|_, r| r.token_digest != token_digest);
        Ok(state.refresh_tokens.len() < before)
    }
}
