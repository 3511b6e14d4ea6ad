//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use kernel::id::{AccountId, MovieId};
use sqlx::PgPool;

use crate::domain::entry::{EntryPatch, ListEntry};
use crate::domain::repository::MovieListRepository;
use crate::domain::value_object::{Score, WatchStatus};
use crate::error::{KinolistError, KinolistResult};

/// PostgreSQL-backed movie list repository
#[derive(Clone)]
pub struct PgMovieListRepository {
    pool: PgPool,
}

impl PgMovieListRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const ENTRY_COLUMNS: &str =
    "account_id, movie_id, title, status, score, is_favorite, added_at, updated_at";

impl MovieListRepository for PgMovieListRepository {
    async fn insert(&self, entry: &ListEntry) -> KinolistResult<()> {
        sqlx::query(
            r#"
            INSERT INTO movie_list_entries (
                account_id,
                movie_id,
                title,
                status,
                score,
                is_favorite,
                added_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(entry.owner.value())
        .bind(entry.movie_id.value())
        .bind(&entry.title)
        .bind(entry.status.code())
        .bind(i16::from(entry.score))
        .bind(entry.favorite)
        .bind(entry.added_at)
        .bind(entry.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => KinolistError::AlreadyListed,
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                KinolistError::AccountGone
            }
            _ => KinolistError::Database(e),
        })?;

        Ok(())
    }

    async fn find_all(&self, owner: AccountId) -> KinolistResult<Vec<ListEntry>> {
        let rows = sqlx::query_as::<_, EntryRow>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM movie_list_entries
             WHERE account_id = $1
             ORDER BY added_at DESC, movie_id DESC"
        ))
        .bind(owner.value())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(EntryRow::into_entry).collect()
    }

    async fn find(&self, owner: AccountId, movie_id: MovieId) -> KinolistResult<Option<ListEntry>> {
        let row = sqlx::query_as::<_, EntryRow>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM movie_list_entries
             WHERE account_id = $1 AND movie_id = $2"
        ))
        .bind(owner.value())
        .bind(movie_id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.map(EntryRow::into_entry).transpose()
    }

    async fn update(
        &self,
        owner: AccountId,
        movie_id: MovieId,
        patch: &EntryPatch,
        at: DateTime<Utc>,
    ) -> KinolistResult<Option<ListEntry>> {
        let row = sqlx::query_as::<_, EntryRow>(&format!(
            r#"
            UPDATE movie_list_entries SET
                status = COALESCE($3, status),
                score = COALESCE($4, score),
                is_favorite = COALESCE($5, is_favorite),
                updated_at = $6
            WHERE account_id = $1 AND movie_id = $2
            RETURNING {ENTRY_COLUMNS}
            "#
        ))
        .bind(owner.value())
        .bind(movie_id.value())
        .bind(patch.status.map(WatchStatus::code))
        .bind(patch.score.map(i16::from))
        .bind(patch.favorite)
        .bind(at)
        .fetch_optional(&self.pool)
        .await?;

        row.map(EntryRow::into_entry).transpose()
    }

    async fn delete(
        &self,
        owner: AccountId,
        movie_id: MovieId,
    ) -> KinolistResult<Option<ListEntry>> {
        let row = sqlx::query_as::<_, EntryRow>(&format!(
            "DELETE FROM movie_list_entries
             WHERE account_id = $1 AND movie_id = $2
             RETURNING {ENTRY_COLUMNS}"
        ))
        .bind(owner.value())
        .bind(movie_id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.map(EntryRow::into_entry).transpose()
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct EntryRow {
    account_id: i64,
    movie_id: i64,
    title: String,
    status: i16,
    score: i16,
    is_favorite: bool,
    added_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl EntryRow {
    fn into_entry(self) -> KinolistResult<ListEntry> {
        let status = WatchStatus::from_code(self.status)
            .map_err(|e| KinolistError::Internal(format!("Invalid status: {}", e)))?;
        let score = Score::new(self.score)
            .map_err(|e| KinolistError::Internal(format!("Invalid score: {}", e)))?;

        Ok(ListEntry {
            owner: AccountId::new(self.account_id),
            movie_id: MovieId::new(self.movie_id),
            title: self.title,
            status,
            score,
            favorite: self.is_favorite,
            added_at: self.added_at,
            updated_at: self.updated_at,
        })
    }
}
