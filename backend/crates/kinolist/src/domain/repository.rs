//! Repository Traits

use chrono::{DateTime, Utc};
use kernel::id::{AccountId, MovieId};

use crate::domain::entry::{EntryPatch, ListEntry};
use crate::error::KinolistResult;

/// Movie list repository trait
///
/// One list per account; `(owner, movie_id)` is unique.
#[trait_variant::make(MovieListRepository: Send)]
pub trait LocalMovieListRepository {
    /// `KinolistError::AlreadyListed` when the owner already has this movie
    async fn insert(&self, entry: &ListEntry) -> KinolistResult<()>;

    /// All of the owner's entries, newest first
    async fn find_all(&self, owner: AccountId) -> KinolistResult<Vec<ListEntry>>;

    async fn find(&self, owner: AccountId, movie_id: MovieId) -> KinolistResult<Option<ListEntry>>;

    /// Apply the patch and return the updated entry, `None` if not listed
    async fn update(
        &self,
        owner: AccountId,
        movie_id: MovieId,
        patch: &EntryPatch,
        at: DateTime<Utc>,
    ) -> KinolistResult<Option<ListEntry>>;

    /// Remove and return the entry, `None` if not listed
    async fn delete(&self, owner: AccountId, movie_id: MovieId)
    -> KinolistResult<Option<ListEntry>>;
}
