//! User Name Value Object
//!
//! ユーザー名は画面表示用のハンドル。ログイン識別子はメールアドレス。
//!
//! ## 不変条件
//! - 長さ: 6〜50文字
//! - 使用可能文字: ASCII英数字と `_` のみ
//! - 大文字小文字は入力のまま保持する

use kernel::error::app_error::{AppError, AppResult};
use std::fmt;

/// Minimum length for user name (in characters)
pub const USER_NAME_MIN_LENGTH: usize = 6;

/// Maximum length for user name (in characters)
pub const USER_NAME_MAX_LENGTH: usize = 50;

const USER_NAME_RULE: &str =
    "username must consist of letters or numbers, also it must contain from 6 to 50 characters";

/// Validated user name
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct UserName(String);

impl UserName {
    pub fn new(raw: impl Into<String>) -> AppResult<Self> {
        let raw = raw.into();
        let length = raw.chars().count();

        let allowed = raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');

        if !allowed || !(USER_NAME_MIN_LENGTH..=USER_NAME_MAX_LENGTH).contains(&length) {
            return Err(AppError::bad_request(USER_NAME_RULE)
                .with_action("Use 6 to 50 letters, digits or underscores"));
        }

        Ok(Self(raw))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<UserName> for String {
    fn from(name: UserName) -> Self {
        name.0
    }
}

impl fmt::Debug for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserName({})", self.0)
    }
}
