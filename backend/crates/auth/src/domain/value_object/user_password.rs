//! User Password Value Object
//!
//! Domain rules for passwords on top of `platform::password`, which owns the
//! cryptography (Argon2id, zeroization, NFKC normalization).
//!
//! Sign-up enforces the content policy; sign-in only requires something
//! that could be a password, so a policy change never locks existing users out.

use kernel::error::app_error::{AppError, AppResult};
use platform::password::{
    ClearTextPassword, HashedPassword, PasswordHashError, PasswordHashParams, PasswordPolicyError,
};
use std::fmt;

/// Sign-up length window (characters)
pub const PASSWORD_MIN_LENGTH: usize = 8;
pub const PASSWORD_MAX_LENGTH: usize = 30;

const PASSWORD_RULE: &str = "password must contain from 8 to 30 characters, be at least one uppercase letter, one lowercase letter and one number";

// ============================================================================
// Raw Password (User Input)
// ============================================================================

/// Raw password from user input, zeroized on drop
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Accept anything usable as a password (sign-in)
    pub fn new(raw: String) -> AppResult<Self> {
        ClearTextPassword::new(raw)
            .map(Self)
            .map_err(|e| match e {
                PasswordPolicyError::EmptyOrWhitespace => {
                    AppError::bad_request("password cannot be empty")
                        .with_action("Please enter a password")
                }
                other => AppError::bad_request(other.to_string()),
            })
    }

    /// Apply the sign-up policy
    ///
    /// 8 to 30 characters with at least one upper-case letter, one lower-case
    /// letter and one digit.
    pub fn for_sign_up(raw: String) -> AppResult<Self> {
        let password = ClearTextPassword::new(raw).map_err(|_| Self::policy_error())?;

        let length = password.char_count();
        let text = password.expose();
        let has_upper = text.chars().any(char::is_uppercase);
        let has_lower = text.chars().any(char::is_lowercase);
        let has_digit = text.chars().any(|c| c.is_ascii_digit());

        if !(PASSWORD_MIN_LENGTH..=PASSWORD_MAX_LENGTH).contains(&length)
            || !(has_upper && has_lower && has_digit)
        {
            return Err(Self::policy_error());
        }

        Ok(Self(password))
    }

    fn policy_error() -> AppError {
        AppError::bad_request(PASSWORD_RULE)
            .with_action("Mix upper-case, lower-case letters and digits")
    }

    pub(crate) fn inner(&self) -> &ClearTextPassword {
        &self.0
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// User Password (Hashed, for storage)
// ============================================================================

/// Hashed user password for database storage (Argon2id PHC string)
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    /// Hash a raw password. Blocking; run it off the async executor.
    pub fn from_raw(
        raw: &RawPassword,
        params: &PasswordHashParams,
        pepper: Option<&[u8]>,
    ) -> Result<Self, PasswordHashError> {
        raw.inner().hash(params, pepper).map(Self)
    }

    /// Load a stored PHC string
    pub fn from_phc(phc: impl Into<String>) -> Result<Self, PasswordHashError> {
        HashedPassword::from_phc_string(phc).map(Self)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_phc_string()
    }

    /// `Err(PasswordHashError::Mismatch)` on a wrong password. Blocking.
    pub fn verify(&self, raw: &RawPassword, pepper: Option<&[u8]>) -> Result<(), PasswordHashError> {
        self.0.verify(raw.inner(), pepper)
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UserPassword").field(&"[HASH]").finish()
    }
}
