//! Application Layer
//!
//! Use cases and application services.

pub mod add_movie;
pub mod config;
mod deadline;
pub mod delete_movie;
pub mod read;
pub mod update_movie;

// Re-exports
pub use add_movie::{AddMovieInput, AddMovieUseCase};
pub use config::KinolistConfig;
pub use delete_movie::DeleteMovieUseCase;
pub use read::{GetMovieUseCase, GetMoviesUseCase, MovieView};
pub use update_movie::{UpdateMovieInput, UpdateMovieUseCase};
