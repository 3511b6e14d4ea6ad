//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod config;
mod store;

use auth::domain::repository::{AccountRepository, RefreshTokenRepository};
use auth::{AuthConfig, AuthMiddlewareState, PgAuthRepository, auth_router_generic};
use axum::{
    Router, http,
    http::{Method, header},
};
use kinolist::domain::catalog::MovieCatalog;
use kinolist::domain::repository::MovieListRepository;
use kinolist::{KinolistConfig, KinopoiskCatalog, PgMovieListRepository, kinolist_router_generic};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer, ExposeHeaders};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;
use crate::store::MemoryStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "mykinolist=info,auth=info,kinolist=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;
    tracing::debug!(?config, "Configuration loaded");

    let auth_config = Arc::new(config.auth);
    let kinolist_config = Arc::new(config.kinolist);
    let catalog = Arc::new(KinopoiskCatalog::from_config(&kinolist_config)?);

    let api = match &config.database_url {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(database_url)
                .await?;

            tracing::info!("Connected to database");

            // Run migrations
            sqlx::migrate!("../../../database/migrations")
                .run(&pool)
                .await?;

            tracing::info!("Migrations completed");

            api_router(
                Arc::new(PgAuthRepository::new(pool.clone())),
                Arc::new(PgMovieListRepository::new(pool)),
                catalog,
                auth_config,
                kinolist_config,
            )
        }
        None => {
            tracing::warn!("DATABASE_URL is not set; using in-memory stores, data is lost on exit");

            let store = Arc::new(MemoryStore::new());
            api_router(
                store.clone(),
                store,
                catalog,
                auth_config,
                kinolist_config,
            )
        }
    };

    // CORS configuration
    let allowed_origins: Vec<http::HeaderValue> = config
        .frontend_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        // Rotated access tokens come back in this header
        .expose_headers(ExposeHeaders::list([header::AUTHORIZATION]))
        .allow_credentials(true);

    let app = api.layer(TraceLayer::new_for_http()).layer(cors);

    // Start server
    tracing::info!("Listening on {}", config.listen_addr);

    let listener = TcpListener::bind(config.listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// `/api/auth` and `/api/list` over one set of stores
fn api_router<A, L, C>(
    auth_repo: Arc<A>,
    list_repo: Arc<L>,
    catalog: Arc<C>,
    auth_config: Arc<AuthConfig>,
    kinolist_config: Arc<KinolistConfig>,
) -> Router
where
    A: AccountRepository + RefreshTokenRepository + Send + Sync + 'static,
    L: MovieListRepository + Send + Sync + 'static,
    C: MovieCatalog + Send + Sync + 'static,
{
    let guard = AuthMiddlewareState::new(auth_repo.clone(), auth_config.clone());

    Router::new()
        .nest("/api/auth", auth_router_generic(auth_repo, auth_config))
        .nest(
            "/api/list",
            kinolist_router_generic(list_repo, catalog, kinolist_config, guard),
        )
}
