//! Add Movie Use Case
//!
//! Searches the catalog for a title and lists the first match.

use std::sync::Arc;

use kernel::id::AccountId;

use crate::application::config::KinolistConfig;
use crate::application::deadline::within;
use crate::domain::catalog::MovieCatalog;
use crate::domain::entry::ListEntry;
use crate::domain::repository::MovieListRepository;
use crate::domain::value_object::{MovieTitle, Score, WatchStatus};
use crate::error::{KinolistError, KinolistResult};

/// Add movie input
#[derive(Debug, Clone, Default)]
pub struct AddMovieInput {
    pub title: String,
    pub status: Option<i16>,
    pub score: Option<i16>,
    pub favorite: Option<bool>,
}

/// Add movie use case
pub struct AddMovieUseCase<L, C>
where
    L: MovieListRepository,
    C: MovieCatalog,
{
    list_repo: Arc<L>,
    catalog: Arc<C>,
    config: Arc<KinolistConfig>,
}

impl<L, C> AddMovieUseCase<L, C>
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

    pub async fn execute(&self, owner: AccountId, input: AddMovieInput) -> KinolistResult<ListEntry> {
        within(self.config.operation_timeout, "add_movie", self.run(owner, input)).await
    }

    async fn run(&self, owner: AccountId, input: AddMovieInput) -> KinolistResult<ListEntry> {
        // Validate everything before calling out
        let title = MovieTitle::new(&input.title).map_err(KinolistError::Validation)?;
        let status = input
            .status
            .map(WatchStatus::from_code)
            .transpose()
            .map_err(KinolistError::Validation)?
            .unwrap_or_default();
        let score = input
            .score
            .map(Score::new)
            .transpose()
            .map_err(KinolistError::Validation)?
            .unwrap_or_default();

        let found = self
            .catalog
            .search(title.as_str())
            .await?
            .ok_or(KinolistError::NotInCatalog)?;

        let entry = ListEntry::new(
            owner,
            found.movie_id,
            found.title,
            status,
            score,
            input.favorite.unwrap_or(false),
        );
        self.list_repo.insert(&entry).await?;

        tracing::info!(
            account_id = %owner,
            movie_id = %entry.movie_id,
            status = %entry.status,
            "Movie added to list"
        );

        Ok(entry)
    }
}
