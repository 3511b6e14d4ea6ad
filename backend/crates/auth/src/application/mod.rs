//! Application Layer
//!
//! Use cases and application services.

pub mod account;
pub mod config;
mod deadline;
pub mod sign_in;
pub mod sign_out;
pub mod sign_up;
pub mod update_tokens;

// Re-exports
pub use account::{DeleteAccountUseCase, GetAccountUseCase};
pub use config::AuthConfig;
pub use sign_in::{SignInInput, SignInUseCase};
pub use sign_out::SignOutUseCase;
pub use sign_up::{SignUpInput, SignUpUseCase};
pub use update_tokens::UpdateTokensUseCase;
