//! Infrastructure Layer
//!
//! Database implementations and the catalog client.

pub mod kinopoisk;
pub mod memory;
pub mod postgres;

pub use kinopoisk::KinopoiskCatalog;
pub use memory::InMemoryMovieListRepository;
pub use postgres::PgMovieListRepository;
