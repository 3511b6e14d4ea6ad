//! List Entry Entity

use chrono::{DateTime, Utc};
use kernel::id::{AccountId, MovieId};

use crate::domain::value_object::{Score, WatchStatus};

/// One movie in an account's list, keyed by `(owner, movie_id)`
#[derive(Debug, Clone, PartialEq)]
pub struct ListEntry {
    pub owner: AccountId,
    pub movie_id: MovieId,
    /// Catalog title at the time it was added
    pub title: String,
    pub status: WatchStatus,
    pub score: Score,
    pub favorite: bool,
    pub added_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ListEntry {
    pub fn new(
        owner: AccountId,
        movie_id: MovieId,
        title: String,
        status: WatchStatus,
        score: Score,
        favorite: bool,
    ) -> Self {
        let now = Utc::now();
        Self {
            owner,
            movie_id,
            title,
            status,
            score,
            favorite,
            added_at: now,
            updated_at: now,
        }
    }
}

/// Partial update; `None` leaves the field as is
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntryPatch {
    pub status: Option<WatchStatus>,
    pub score: Option<Score>,
    pub favorite: Option<bool>,
}

impl EntryPatch {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.score.is_none() && self.favorite.is_none()
    }

    pub fn apply(&self, entry: &mut ListEntry, at: DateTime<Utc>) {
        if let Some(status) = self.status {
            entry.status = status;
        }
        if let Some(score) = self.score {
            entry.score = score;
        }
        if let Some(favorite) = self.favorite {
            entry.favorite = favorite;
        }
        entry.updated_at = at;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_touches_only_given_fields() {
        let mut entry = ListEntry::new(
            AccountId::new(1),
            MovieId::new(326),
            "The Shawshank Redemption".to_string(),
            WatchStatus::default(),
            Score::UNRATED,
            false,
        );
        let added_at = entry.added_at;
        let later = added_at + chrono::Duration::seconds(5);

        let patch = EntryPatch {
            favorite: Some(true),
            ..Default::default()
        };
        assert!(!patch.is_empty());
        patch.apply(&mut entry, later);

        assert!(entry.favorite);
        assert_eq!(entry.status, WatchStatus::PlanToWatch);
        assert_eq!(entry.score, Score::UNRATED);
        assert_eq!(entry.added_at, added_at);
        assert_eq!(entry.updated_at, later);
    }

    #[test]
    fn test_empty_patch() {
        assert!(EntryPatch::default().is_empty());
    }
}
