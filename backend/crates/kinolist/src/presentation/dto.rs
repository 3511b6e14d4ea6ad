//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::{AddMovieInput, MovieView, UpdateMovieInput};
use crate::domain::catalog::MovieDetails;
use crate::domain::entry::ListEntry;
use crate::domain::value_object::WatchStatus;

/// Add movie request
///
/// Status and score are raw codes so that out-of-range values produce the
/// list's own validation messages.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMovieRequest {
    pub title: String,
    pub status: Option<i16>,
    pub score: Option<i16>,
    pub is_favorite: Option<bool>,
}

impl From<AddMovieRequest> for AddMovieInput {
    fn from(req: AddMovieRequest) -> Self {
        Self {
            title: req.title,
            status: req.status,
            score: req.score,
            favorite: req.is_favorite,
        }
    }
}

/// Update movie request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMovieRequest {
    pub status: Option<i16>,
    pub score: Option<i16>,
    pub is_favorite: Option<bool>,
}

impl From<UpdateMovieRequest> for UpdateMovieInput {
    fn from(req: UpdateMovieRequest) -> Self {
        Self {
            status: req.status,
            score: req.score,
            favorite: req.is_favorite,
        }
    }
}

/// List entry as shown to its owner
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryResponse {
    pub movie_id: i64,
    pub title: String,
    pub status: WatchStatus,
    pub score: u8,
    pub is_favorite: bool,
    pub added_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ListEntry> for EntryResponse {
    fn from(entry: ListEntry) -> Self {
        Self {
            movie_id: entry.movie_id.value(),
            title: entry.title,
            status: entry.status,
            score: entry.score.value(),
            is_favorite: entry.favorite,
            added_at: entry.added_at,
            updated_at: entry.updated_at,
        }
    }
}

/// Entry plus catalog details
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieResponse {
    #[serde(flatten)]
    pub entry: EntryResponse,
    pub details: Option<MovieDetails>,
}

impl From<MovieView> for MovieResponse {
    fn from(view: MovieView) -> Self {
        Self {
            entry: view.entry.into(),
            details: view.details,
        }
    }
}
