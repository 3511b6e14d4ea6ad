//! Kinolist (Movie List) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - List entries, watch status, score, catalog and repository traits
//! - `application/` - Use cases and configuration
//! - `infra/` - PostgreSQL and in-memory repositories, Kinopoisk catalog client
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Add the first catalog match for a title to the caller's list
//! - List entries newest first
//! - Single entry together with catalog details
//! - Partial update of status, score and favorite flag
//! - Removal returning the removed entry
//!
//! Every route sits behind `auth::require_auth`; handlers only ever see the
//! caller's own list.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::KinolistConfig;
pub use error::{KinolistError, KinolistResult};
pub use infra::{InMemoryMovieListRepository, KinopoiskCatalog, PgMovieListRepository};
pub use presentation::router::{kinolist_router, kinolist_router_generic};
