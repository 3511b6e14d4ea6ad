//! Entities

pub mod account;
pub mod refresh_token;

pub use account::{Account, NewAccount};
pub use refresh_token::RefreshRecord;
