//! Value Objects
//!
//! Watch status, score and movie title, each validated on construction.

use derive_more::Display;
use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

// ============================================================================
// Watch Status
// ============================================================================

/// Where the owner is with a movie
///
/// Stored and sent as its integer code.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
pub enum WatchStatus {
    #[display("watching")]
    Watching,
    #[display("completed")]
    Completed,
    #[display("on_hold")]
    OnHold,
    #[display("dropped")]
    Dropped,
    #[default]
    #[display("plan_to_watch")]
    PlanToWatch,
}

impl WatchStatus {
    pub const fn code(self) -> i16 {
        match self {
            WatchStatus::Watching => 1,
            WatchStatus::Completed => 2,
            WatchStatus::OnHold => 3,
            WatchStatus::Dropped => 4,
            WatchStatus::PlanToWatch => 5,
        }
    }

    pub fn from_code(code: i16) -> AppResult<Self> {
        match code {
            1 => Ok(WatchStatus::Watching),
            2 => Ok(WatchStatus::Completed),
            3 => Ok(WatchStatus::OnHold),
            4 => Ok(WatchStatus::Dropped),
            5 => Ok(WatchStatus::PlanToWatch),
            _ => Err(AppError::bad_request("status must be between 1 and 5").with_action(
                "Use 1 (watching), 2 (completed), 3 (on hold), 4 (dropped) or 5 (plan to watch)",
            )),
        }
    }
}

impl TryFrom<i16> for WatchStatus {
    type Error = AppError;

    fn try_from(code: i16) -> AppResult<Self> {
        WatchStatus::from_code(code)
    }
}

impl From<WatchStatus> for i16 {
    fn from(status: WatchStatus) -> Self {
        status.code()
    }
}

// ============================================================================
// Score
// ============================================================================

/// Owner's rating; 0 means unrated
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
pub struct Score(u8);

impl Score {
    pub const UNRATED: Score = Score(0);
    pub const MAX: u8 = 10;

    pub fn new(value: i16) -> AppResult<Self> {
        match u8::try_from(value) {
            Ok(v) if v <= Self::MAX => Ok(Self(v)),
            _ => Err(AppError::bad_request("score must be between 0 and 10")
                .with_action("Use 0 to clear the score")),
        }
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    pub const fn is_rated(self) -> bool {
        self.0 > 0
    }
}

impl TryFrom<i16> for Score {
    type Error = AppError;

    fn try_from(value: i16) -> AppResult<Self> {
        Score::new(value)
    }
}

impl From<Score> for i16 {
    fn from(score: Score) -> Self {
        i16::from(score.0)
    }
}

// ============================================================================
// Movie Title (search query)
// ============================================================================

/// Maximum title length accepted as a search query (in characters)
pub const MOVIE_TITLE_MAX_LENGTH: usize = 200;

/// Non-empty, trimmed title used to query the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieTitle(String);

impl MovieTitle {
    pub fn new(raw: &str) -> AppResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AppError::bad_request("empty movie name"));
        }
        if trimmed.chars().count() > MOVIE_TITLE_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "movie name must not exceed {MOVIE_TITLE_MAX_LENGTH} characters"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
