//! In-Memory Repository Implementation

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use kernel::id::{AccountId, MovieId};
use tokio::sync::RwLock;

use crate::domain::entry::{EntryPatch, ListEntry};
use crate::domain::repository::MovieListRepository;
use crate::error::{KinolistError, KinolistResult};

/// In-memory movie list repository
#[derive(Clone, Default)]
pub struct InMemoryMovieListRepository {
    entries: Arc<RwLock<HashMap<(AccountId, MovieId), ListEntry>>>,
}

impl InMemoryMovieListRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every entry of `owner`. Returns how many were removed.
    pub async fn purge_owner(&self, owner: AccountId) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|(id, _), _| *id != owner);
        before - entries.len()
    }
}

impl MovieListRepository for InMemoryMovieListRepository {
    async fn insert(&self, entry: &ListEntry) -> KinolistResult<()> {
        let mut entries = self.entries.write().await;
        let key = (entry.owner, entry.movie_id);

        if entries.contains_key(&key) {
            return Err(KinolistError::AlreadyListed);
        }
        entries.insert(key, entry.clone());

        Ok(())
    }

    async fn find_all(&self, owner: AccountId) -> KinolistResult<Vec<ListEntry>> {
        let entries = self.entries.read().await;
        let mut owned: Vec<ListEntry> = entries
            .values()
            .filter(|e| e.owner == owner)
            .cloned()
            .collect();

        owned.sort_by(|a, b| {
            b.added_at
                .cmp(&a.added_at)
                .then_with(|| b.movie_id.cmp(&a.movie_id))
        });

        Ok(owned)
    }

    async fn find(&self, owner: AccountId, movie_id: MovieId) -> KinolistResult<Option<ListEntry>> {
        Ok(self.entries.read().await.get(&(owner, movie_id)).cloned())
    }

    async fn update(
        &self,
        owner: AccountId,
        movie_id: MovieId,
        patch: &EntryPatch,
        at: DateTime<Utc>,
    ) -> KinolistResult<Option<ListEntry>> {
        let mut entries = self.entries.write().await;

        Ok(entries.get_mut(&(owner, movie_id)).map(|entry| {
            patch.apply(entry, at);
            entry.clone()
        }))
    }

    async fn delete(
        &self,
        owner: AccountId,
        movie_id: MovieId,
    ) -> KinolistResult<Option<ListEntry>> {
        Ok(self.entries.write().await.remove(&(owner, movie_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{Score, WatchStatus};

    fn entry(owner: i64, movie: i64, added_secs: i64) -> ListEntry {
        let mut entry = ListEntry::new(
            AccountId::new(owner),
            MovieId::new(movie),
            format!("movie {movie}"),
            WatchStatus::default(),
            Score::UNRATED,
            false,
        );
        entry.added_at = DateTime::from_timestamp(1_700_000_000 + added_secs, 0).unwrap();
        entry.updated_at = entry.added_at;
        entry
    }

    #[tokio::test]
    async fn test_duplicate_is_conflict() {
        let repo = InMemoryMovieListRepository::new();
        repo.insert(&entry(1, 10, 0)).await.unwrap();

        assert!(matches!(
            repo.insert(&entry(1, 10, 5)).await,
            Err(KinolistError::AlreadyListed)
        ));
        // Same movie in another list is fine
        repo.insert(&entry(2, 10, 0)).await.unwrap();
    }

    #[tokio::test]
    async fn test_find_all_is_owner_scoped_and_newest_first() {
        let repo = InMemoryMovieListRepository::new();
        repo.insert(&entry(1, 10, 0)).await.unwrap();
        repo.insert(&entry(1, 11, 20)).await.unwrap();
        repo.insert(&entry(1, 12, 10)).await.unwrap();
        repo.insert(&entry(2, 13, 30)).await.unwrap();

        let ids: Vec<i64> = repo
            .find_all(AccountId::new(1))
            .await
            .unwrap()
            .iter()
            .map(|e| e.movie_id.value())
            .collect();
        assert_eq!(ids, vec![11, 12, 10]);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing() {
        let repo = InMemoryMovieListRepository::new();
        let owner = AccountId::new(1);
        let movie = MovieId::new(10);
        let patch = EntryPatch {
            score: Some(Score::new(8).unwrap()),
            ..Default::default()
        };

        assert_eq!(repo.update(owner, movie, &patch, Utc::now()).await.unwrap(), None);
        assert_eq!(repo.delete(owner, movie).await.unwrap(), None);

        repo.insert(&entry(1, 10, 0)).await.unwrap();
        let updated = repo
            .update(owner, movie, &patch, Utc::now())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.score.value(), 8);
        assert_eq!(repo.delete(owner, movie).await.unwrap(), Some(updated));
        assert_eq!(repo.find(owner, movie).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_purge_owner_keeps_other_lists() {
        let repo = InMemoryMovieListRepository::new();
        repo.insert(&entry(1, 10, 0)).await.unwrap();
        repo.insert(&entry(1, 11, 5)).await.unwrap();
        repo.insert(&entry(2, 10, 0)).await.unwrap();

        assert_eq!(repo.purge_owner(AccountId::new(1)).await, 2);
        assert!(repo.find_all(AccountId::new(1)).await.unwrap().is_empty());
        assert_eq!(repo.find_all(AccountId::new(2)).await.unwrap().len(), 1);
        assert_eq!(repo.purge_owner(AccountId::new(1)).await, 0);
    }
}
