//! Movie Catalog
//!
//! Third-party movie metadata. The list only stores the catalog id and the
//! title; everything else is looked up on demand.

use kernel::id::MovieId;
use serde::Serialize;

use crate::error::KinolistResult;

/// Best search hit for a title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogMatch {
    pub movie_id: MovieId,
    pub title: String,
}

/// Movie details from a lookup by id
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieDetails {
    pub movie_id: MovieId,
    pub title: String,
    pub alternative_title: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub rating: Option<f64>,
    /// Minutes
    pub length: Option<i32>,
    pub genres: Vec<String>,
    pub countries: Vec<String>,
    pub poster_url: Option<String>,
}

/// Catalog client trait
#[trait_variant::make(MovieCatalog: Send)]
pub trait LocalMovieCatalog {
    /// First match for a free-text title, if any
    async fn search(&self, title: &str) -> KinolistResult<Option<CatalogMatch>>;

    /// Details for a catalog id; `None` when the catalog does not know it
    async fn lookup(&self, movie_id: MovieId) -> KinolistResult<Option<MovieDetails>>;
}
