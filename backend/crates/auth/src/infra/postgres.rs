//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::id::AccountId;
use sqlx::PgPool;

use crate::domain::entity::{Account, NewAccount, RefreshRecord};
use crate::domain::repository::{AccountRepository, RefreshTokenRepository};
use crate::domain::value_object::{Email, UserName, UserPassword};
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const ACCOUNT_COLUMNS: &str = "id, user_name, email, password_hash, created_at, last_login_at";

// ============================================================================
// Account Repository Implementation
// ============================================================================

impl AccountRepository for PgAuthRepository {
    async fn create(&self, account: &NewAccount) -> AuthResult<AccountId> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO accounts (
                user_name,
                email,
                password_hash,
                created_at,
                last_login_at
            ) VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(account.user_name.as_str())
        .bind(account.email.as_str())
        .bind(account.password_hash.as_str())
        .bind(account.created_at)
        .bind(account.last_login_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => AuthError::EmailTaken,
            _ => AuthError::Database(e),
        })?;

        Ok(AccountId::new(id))
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(AccountRow::into_account).transpose()
    }

    async fn find_by_id(&self, id: AccountId) -> AuthResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"
        ))
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.map(AccountRow::into_account).transpose()
    }

    async fn update_last_login(&self, id: AccountId, at: DateTime<Utc>) -> AuthResult<()> {
        sqlx::query("UPDATE accounts SET last_login_at = $2 WHERE id = $1")
            .bind(id.value())
            .bind(at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete(&self, id: AccountId) -> AuthResult<Option<Account>> {
        // refresh_tokens and movie_list_entries go with it (ON DELETE CASCADE)
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "DELETE FROM accounts WHERE id = $1 RETURNING {ACCOUNT_COLUMNS}"
        ))
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.map(AccountRow::into_account).transpose()
    }
}

// ============================================================================
// Refresh Token Repository Implementation
// ============================================================================

impl RefreshTokenRepository for PgAuthRepository {
    async fn upsert(&self, record: &RefreshRecord) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (account_id, token_digest, issued_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (account_id) DO UPDATE SET
                token_digest = EXCLUDED.token_digest,
                issued_at = EXCLUDED.issued_at
            "#,
        )
        .bind(record.account_id.value())
        .bind(&record.token_digest)
        .bind(record.issued_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn replace(&self, current_digest: &str, next: &RefreshRecord) -> AuthResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE refresh_tokens SET
                token_digest = $3,
                issued_at = $4
            WHERE account_id = $1 AND token_digest = $2
            "#,
        )
        .bind(next.account_id.value())
        .bind(current_digest)
        .bind(&next.token_digest)
        .bind(next.issued_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn remove(&self, token_digest: &str) -> AuthResult<bool> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE token_digest = $1")
            .bind(token_digest)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: i64,
    user_name: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    last_login_at: DateTime<Utc>,
}

impl AccountRow {
    fn into_account(self) -> AuthResult<Account> {
        let password_hash = UserPassword::from_phc(self.password_hash)
            .map_err(|e| AuthError::Internal(format!("Invalid password_hash: {}", e)))?;

        Ok(Account {
            id: AccountId::new(self.id),
            user_name: UserName::from_db(self.user_name),
            email: Email::from_db(self.email),
            password_hash,
            created_at: self.created_at,
            last_login_at: self.last_login_at,
        })
    }
}
