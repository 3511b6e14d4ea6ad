//! Read Use Cases
//!
//! Whole list, and a single entry with its catalog details.

use std::sync::Arc;

use kernel::id::{AccountId, MovieId};

use crate::application::config::KinolistConfig;
use crate::application::deadline::within;
use crate::domain::catalog::{MovieCatalog, MovieDetails};
use crate::domain::entry::ListEntry;
use crate::domain::repository::MovieListRepository;
use crate::error::{KinolistError, KinolistResult};

/// Get movies use case
pub struct GetMoviesUseCase<L>
where
    L: MovieListRepository,
{
    list_repo: Arc<L>,
    config: Arc<KinolistConfig>,
}

impl<L> GetMoviesUseCase<L>
where
    L: MovieListRepository,
{
    pub fn new(list_repo: Arc<L>, config: Arc<KinolistConfig>) -> Self {
        Self { list_repo, config }
    }

    /// Newest first
    pub async fn execute(&self, owner: AccountId) -> KinolistResult<Vec<ListEntry>> {
        within(
            self.config.operation_timeout,
            "get_movies",
            self.list_repo.find_all(owner),
        )
        .await
    }
}

/// An entry together with what the catalog currently says about it
#[derive(Debug, Clone)]
pub struct MovieView {
    pub entry: ListEntry,
    /// `None` when the catalog no longer knows the movie
    pub details: Option<MovieDetails>,
}

/// Get movie use case
pub struct GetMovieUseCase<L, C>
where
    L: MovieListRepository,
    C: MovieCatalog,
{
    list_repo: Arc<L>,
    catalog: Arc<C>,
    config: Arc<KinolistConfig>,
}

impl<L, C> GetMovieUseCase<L, C>
where
    L: MovieListRepository,
    C: MovieCatalog,
{
    pub fn new(list_repo: Arc<L>, catalog: Arc<C>, config: Arc<KinolistConfig>) -> Self {
        Self {
            list_repo,
            catalog,
            config,
        }
    }

    pub async fn execute(&self, owner: AccountId, movie_id: MovieId) -> KinolistResult<MovieView> {
        within(self.config.operation_timeout, "get_movie", async {
            // Only listed movies reach the catalog
            let entry = self
                .list_repo
                .find(owner, movie_id)
                .await?
                .ok_or(KinolistError::NotListed)?;

            let details = self.catalog.lookup(movie_id).await?;
            if details.is_none() {
                tracing::warn!(movie_id = %movie_id, "Listed movie is missing from the catalog");
            }

            Ok(MovieView { entry, details })
        })
        .await
    }
}
