//! HTTP Handlers
//!
//! All handlers run behind `auth::require_auth`; the list is always the
//! caller's own.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use auth::AuthenticatedAccount;
use kernel::id::MovieId;
use std::sync::Arc;

use crate::application::config::KinolistConfig;
use crate::application::{
    AddMovieUseCase, DeleteMovieUseCase, GetMovieUseCase, GetMoviesUseCase, UpdateMovieUseCase,
};
use crate::domain::catalog::MovieCatalog;
use crate::domain::repository::MovieListRepository;
use crate::error::KinolistResult;
use crate::presentation::dto::{
    AddMovieRequest, EntryResponse, MovieResponse, UpdateMovieRequest,
};

/// Shared state for list handlers
pub struct KinolistAppState<L, C>
where
    L: MovieListRepository + Send + Sync + 'static,
    C: MovieCatalog + Send + Sync + 'static,
{
    pub list_repo: Arc<L>,
    pub catalog: Arc<C>,
    pub config: Arc<KinolistConfig>,
}

impl<L, C> Clone for KinolistAppState<L, C>
where
    L: MovieListRepository + Send + Sync + 'static,
    C: MovieCatalog + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            list_repo: self.list_repo.clone(),
            catalog: self.catalog.clone(),
            config: self.config.clone(),
        }
    }
}

/// POST /api/list
pub async fn add_movie<L, C>(
    State(state): State<KinolistAppState<L, C>>,
    caller: AuthenticatedAccount,
    Json(req): Json<AddMovieRequest>,
) -> KinolistResult<(StatusCode, Json<EntryResponse>)>
where
    L: MovieListRepository + Send + Sync + 'static,
    C: MovieCatalog + Send + Sync + 'static,
{
    let use_case = AddMovieUseCase::new(
        state.list_repo.clone(),
        state.catalog.clone(),
        state.config.clone(),
    );
    let entry = use_case.execute(caller.id(), req.into()).await?;

    Ok((StatusCode::CREATED, Json(entry.into())))
}

/// GET /api/list
pub async fn get_movies<L, C>(
    State(state): State<KinolistAppState<L, C>>,
    caller: AuthenticatedAccount,
) -> KinolistResult<Json<Vec<EntryResponse>>>
where
    L: MovieListRepository + Send + Sync + 'static,
    C: MovieCatalog + Send + Sync + 'static,
{
    let use_case = GetMoviesUseCase::new(state.list_repo.clone(), state.config.clone());
    let entries = use_case.execute(caller.id()).await?;

    Ok(Json(entries.into_iter().map(EntryResponse::from).collect()))
}

/// GET /api/list/{movie_id}
pub async fn get_movie<L, C>(
    State(state): State<KinolistAppState<L, C>>,
    caller: AuthenticatedAccount,
    Path(movie_id): Path<i64>,
) -> KinolistResult<Json<MovieResponse>>
where
    L: MovieListRepository + Send + Sync + 'static,
    C: MovieCatalog + Send + Sync + 'static,
{
    let use_case = GetMovieUseCase::new(
        state.list_repo.clone(),
        state.catalog.clone(),
        state.config.clone(),
    );
    let view = use_case.execute(caller.id(), MovieId::new(movie_id)).await?;

    Ok(Json(view.into()))
}

/// PATCH /api/list/{movie_id}
pub async fn update_movie<L, C>(
    State(state): State<KinolistAppState<L, C>>,
    caller: AuthenticatedAccount,
    Path(movie_id): Path<i64>,
    Json(req): Json<UpdateMovieRequest>,
) -> KinolistResult<Json<EntryResponse>>
where
    L: MovieListRepository + Send + Sync + 'static,
    C: MovieCatalog + Send + Sync + 'static,
{
    let use_case = UpdateMovieUseCase::new(state.list_repo.clone(), state.config.clone());
    let entry = use_case
        .execute(caller.id(), MovieId::new(movie_id), req.into())
        .await?;

    Ok(Json(entry.into()))
}

/// DELETE /api/list/{movie_id}
pub async fn delete_movie<L, C>(
    State(state): State<KinolistAppState<L, C>>,
    caller: AuthenticatedAccount,
    Path(movie_id): Path<i64>,
) -> KinolistResult<Json<EntryResponse>>
where
    L: MovieListRepository + Send + Sync + 'static,
    C: MovieCatalog + Send + Sync + 'static,
{
    let use_case = DeleteMovieUseCase::new(state.list_repo.clone(), state.config.clone());
    let removed = use_case.execute(caller.id(), MovieId::new(movie_id)).await?;

    Ok(Json(removed.into()))
}
