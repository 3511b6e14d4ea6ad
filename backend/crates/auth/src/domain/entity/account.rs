//! Account Entity
//!
//! The identity record. The id is assigned by persistence and never changes.

use chrono::{DateTime, Utc};
use kernel::id::AccountId;

use crate::domain::value_object::{Email, UserName, UserPassword};

/// Stored account
#[derive(Debug, Clone)]
pub struct Account {
    pub id: AccountId,
    pub user_name: UserName,
    /// Unique, the sign-in identifier
    pub email: Email,
    pub password_hash: UserPassword,
    pub created_at: DateTime<Utc>,
    pub last_login_at: DateTime<Utc>,
}

/// Account about to be inserted (no id yet)
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub user_name: UserName,
    pub email: Email,
    pub password_hash: UserPassword,
    pub created_at: DateTime<Utc>,
    pub last_login_at: DateTime<Utc>,
}

impl NewAccount {
    /// Both timestamps start at `now`
    pub fn new(user_name: UserName, email: Email, password_hash: UserPassword) -> Self {
        let now = Utc::now();
        Self {
            user_name,
            email,
            password_hash,
            created_at: now,
            last_login_at: now,
        }
    }

    /// Attach the id persistence assigned
    pub fn into_account(self, id: AccountId) -> Account {
        Account {
            id,
            user_name: self.user_name,
            email: self.email,
            password_hash: self.password_hash,
            created_at: self.created_at,
            last_login_at: self.last_login_at,
        }
    }
}
