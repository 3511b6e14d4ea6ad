//! Domain Layer
//!
//! List entries, value objects, catalog and repository traits.

pub mod catalog;
pub mod entry;
pub mod repository;
pub mod value_object;

// Re-exports
pub use catalog::{CatalogMatch, MovieCatalog, MovieDetails};
pub use entry::{EntryPatch, ListEntry};
pub use repository::MovieListRepository;
pub use value_object::{MovieTitle, Score, WatchStatus};
