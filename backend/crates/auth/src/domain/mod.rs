//! Domain Layer
//!
//! Contains entities, value objects, the token codec and repository traits.

pub mod entity;
pub mod repository;
pub mod token;
pub mod value_object;

// Re-exports
pub use entity::{Account, NewAccount, RefreshRecord};
pub use repository::{AccountRepository, RefreshTokenRepository};
pub use token::{TokenClaims, TokenCodec, TokenError, TokenKind, TokenPair};
