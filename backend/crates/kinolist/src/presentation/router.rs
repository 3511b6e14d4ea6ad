//! Kinolist Router

use auth::domain::repository::RefreshTokenRepository;
use auth::{AuthMiddlewareState, PgAuthRepository, require_auth};
use axum::{Router, middleware, routing::get};
use std::sync::Arc;

use crate::application::config::KinolistConfig;
use crate::domain::catalog::MovieCatalog;
use crate::domain::repository::MovieListRepository;
use crate::infra::{KinopoiskCatalog, PgMovieListRepository};
use crate::presentation::handlers::{self, KinolistAppState};

/// Create the Kinolist router with PostgreSQL repositories and the Kinopoisk catalog
pub fn kinolist_router(
    list_repo: Arc<PgMovieListRepository>,
    catalog: Arc<KinopoiskCatalog>,
    config: Arc<KinolistConfig>,
    guard: AuthMiddlewareState<PgAuthRepository>,
) -> Router {
    kinolist_router_generic(list_repo, catalog, config, guard)
}

/// Create a generic Kinolist router
///
/// Meant to be nested under `/api/list`. Every route requires
/// authentication through `guard`.
pub fn kinolist_router_generic<L, C, R>(
    list_repo: Arc<L>,
    catalog: Arc<C>,
    config: Arc<KinolistConfig>,
    guard: AuthMiddlewareState<R>,
) -> Router
where
    L: MovieListRepository + Send + Sync + 'static,
    C: MovieCatalog + Send + Sync + 'static,
    R: RefreshTokenRepository + Send + Sync + 'static,
{
    let state = KinolistAppState {
        list_repo,
        catalog,
        config,
    };

    Router::new()
        .route(
            "/",
            get(handlers::get_movies::<L, C>).post(handlers::add_movie::<L, C>),
        )
        .route(
            "/{movie_id}",
            get(handlers::get_movie::<L, C>)
                .patch(handlers::update_movie::<L, C>)
                .delete(handlers::delete_movie::<L, C>),
        )
        .route_layer(middleware::from_fn_with_state(guard, require_auth::<R>))
        .with_state(state)
}
