//! Kinopoisk catalog client
//!
//! Wraps the two Kinopoisk API endpoints the list needs, using [`reqwest`]:
//! - `GET /v1.2/movie/search?page=1&limit=1&query=<title>` for the first match
//! - `GET /v1.3/movie/{id}` for details
//!
//! Every request carries the API key in `X-API-KEY`.

use kernel::id::MovieId;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::application::config::KinolistConfig;
use crate::domain::catalog::{CatalogMatch, MovieCatalog, MovieDetails};
use crate::error::{KinolistError, KinolistResult};

const API_KEY_HEADER: &str = "X-API-KEY";

/// HTTP client for the Kinopoisk API
#[derive(Clone)]
pub struct KinopoiskCatalog {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl KinopoiskCatalog {
    /// Build a client with the configured request timeout
    pub fn from_config(config: &KinolistConfig) -> KinolistResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.catalog_timeout)
            .build()
            .map_err(|e| KinolistError::Internal(format!("catalog client: {e}")))?;

        Ok(Self::with_client(
            client,
            config.catalog_base_url.clone(),
            config.catalog_api_key.clone(),
        ))
    }

    /// Reuse an existing [`reqwest::Client`]
    pub fn with_client(client: reqwest::Client, base_url: String, api_key: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    async fn get(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> KinolistResult<Option<reqwest::Response>> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .query(query)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(KinolistError::Catalog(format!(
                "{path} returned {}: {body}",
                status.as_u16()
            )));
        }

        Ok(Some(response))
    }
}

impl MovieCatalog for KinopoiskCatalog {
    async fn search(&self, title: &str) -> KinolistResult<Option<CatalogMatch>> {
        let Some(response) = self
            .get(
                "/v1.2/movie/search",
                &[("page", "1"), ("limit", "1"), ("query", title)],
            )
            .await?
        else {
            return Ok(None);
        };

        let page: SearchPage = response.json().await?;
        tracing::debug!(query = title, hits = page.docs.len(), "Catalog search");

        Ok(page.docs.into_iter().find_map(SearchDoc::into_match))
    }

    async fn lookup(&self, movie_id: MovieId) -> KinolistResult<Option<MovieDetails>> {
        let path = format!("/v1.3/movie/{}", movie_id.value());
        let Some(response) = self.get(&path, &[]).await? else {
            return Ok(None);
        };

        let movie: MovieDoc = response.json().await?;
        Ok(Some(movie.into_details(movie_id)))
    }
}

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct SearchPage {
    #[serde(default)]
    docs: Vec<SearchDoc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchDoc {
    id: i64,
    name: Option<String>,
    alternative_name: Option<String>,
}

impl SearchDoc {
    /// A hit with no usable title is skipped
    fn into_match(self) -> Option<CatalogMatch> {
        let title = pick_title(self.name, self.alternative_name)?;
        Some(CatalogMatch {
            movie_id: MovieId::new(self.id),
            title,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct MovieDoc {
    name: Option<String>,
    alternative_name: Option<String>,
    year: Option<i32>,
    description: Option<String>,
    rating: Option<RatingDoc>,
    movie_length: Option<i32>,
    genres: Vec<NamedDoc>,
    countries: Vec<NamedDoc>,
    poster: Option<PosterDoc>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RatingDoc {
    kp: Option<f64>,
    imdb: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct NamedDoc {
    name: String,
}

#[derive(Debug, Deserialize)]
struct PosterDoc {
    url: Option<String>,
}

impl MovieDoc {
    fn into_details(self, movie_id: MovieId) -> MovieDetails {
        // Kinopoisk reports 0 for "no rating"
        let rating = self
            .rating
            .and_then(|r| r.kp.filter(|v| *v > 0.0).or(r.imdb.filter(|v| *v > 0.0)));

        MovieDetails {
            movie_id,
            title: pick_title(self.name, self.alternative_name.clone()).unwrap_or_default(),
            alternative_title: self.alternative_name,
            year: self.year,
            description: self.description,
            rating,
            length: self.movie_length,
            genres: self.genres.into_iter().map(|g| g.name).collect(),
            countries: self.countries.into_iter().map(|c| c.name).collect(),
            poster_url: self.poster.and_then(|p| p.url),
        }
    }
}

fn pick_title(name: Option<String>, alternative: Option<String>) -> Option<String> {
    name.filter(|n| !n.trim().is_empty())
        .or(alternative.filter(|n| !n.trim().is_empty()))
}
