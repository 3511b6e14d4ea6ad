//! Delete Movie Use Case

use std::sync::Arc;

use kernel::id::{AccountId, MovieId};

use crate::application::config::KinolistConfig;
use crate::application::deadline::within;
use crate::domain::entry::ListEntry;
use crate::domain::repository::MovieListRepository;
use crate::error::{KinolistError, KinolistResult};

/// Delete movie use case
pub struct DeleteMovieUseCase<L>
where
    L: MovieListRepository,
{
    list_repo: Arc<L>,
    config: Arc<KinolistConfig>,
}

impl<L> DeleteMovieUseCase<L>
where
    L: MovieListRepository,
{
    pub fn new(list_repo: Arc<L>, config: Arc<KinolistConfig>) -> Self {
        Self { list_repo, config }
    }

    /// Fetch, then remove; returns the removed entry
    pub async fn execute(&self, owner: AccountId, movie_id: MovieId) -> KinolistResult<ListEntry> {
        within(self.config.operation_timeout, "delete_movie", async {
            self.list_repo
                .find(owner, movie_id)
                .await?
                .ok_or(KinolistError::NotListed)?;

            let removed = self
                .list_repo
                .delete(owner, movie_id)
                .await?
                .ok_or(KinolistError::NotListed)?;

            tracing::info!(account_id = %owner, movie_id = %movie_id, "Movie removed from list");
            Ok(removed)
        })
        .await
    }
}
