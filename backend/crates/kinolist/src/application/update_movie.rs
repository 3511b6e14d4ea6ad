//! Update Movie Use Case

use std::sync::Arc;

use chrono::Utc;
use kernel::error::app_error::AppError;
use kernel::id::{AccountId, MovieId};

use crate::application::config::KinolistConfig;
use crate::application::deadline::within;
use crate::domain::entry::{EntryPatch, ListEntry};
use crate::domain::repository::MovieListRepository;
use crate::domain::value_object::{Score, WatchStatus};
use crate::error::{KinolistError, KinolistResult};

/// Update movie input; at least one field must be present
#[derive(Debug, Clone, Default)]
pub struct UpdateMovieInput {
    pub status: Option<i16>,
    pub score: Option<i16>,
    pub favorite: Option<bool>,
}

impl UpdateMovieInput {
    fn into_patch(self) -> KinolistResult<EntryPatch> {
        let patch = EntryPatch {
            status: self
                .status
                .map(WatchStatus::from_code)
                .transpose()
                .map_err(KinolistError::Validation)?,
            score: self
                .score
                .map(Score::new)
                .transpose()
                .map_err(KinolistError::Validation)?,
            favorite: self.favorite,
        };

        if patch.is_empty() {
            return Err(KinolistError::Validation(
                AppError::bad_request("nothing to update")
                    .with_action("Provide at least one of status, score or isFavorite"),
            ));
        }

        Ok(patch)
    }
}

/// Update movie use case
pub struct UpdateMovieUseCase<L>
where
    L: MovieListRepository,
{
    list_repo: Arc<L>,
    config: Arc<KinolistConfig>,
}

impl<L> UpdateMovieUseCase<L>
where
    L: MovieListRepository,
{
    pub fn new(list_repo: Arc<L>, config: Arc<KinolistConfig>) -> Self {
        Self { list_repo, config }
    }

    pub async fn execute(
        &self,
        owner: AccountId,
        movie_id: MovieId,
        input: UpdateMovieInput,
    ) -> KinolistResult<ListEntry> {
        let patch = input.into_patch()?;

        within(self.config.operation_timeout, "update_movie", async {
            let entry = self
                .list_repo
                .update(owner, movie_id, &patch, Utc::now())
                .await?
                .ok_or(KinolistError::NotListed)?;

            tracing::info!(account_id = %owner, movie_id = %movie_id, "List entry updated");
            Ok(entry)
        })
        .await
    }
}
