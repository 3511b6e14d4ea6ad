//! Value Objects
//!
//! Validated input types. Constructors reject bad input with a
//! `400 Bad Request` [`AppError`](kernel::error::app_error::AppError).

pub mod email;
pub mod user_name;
pub mod user_password;

pub use email::Email;
pub use user_name::UserName;
pub use user_password::{RawPassword, UserPassword};
