//! Refresh Token Record
//!
//! At most one per account. The raw token never reaches storage; only its
//! SHA-256 fingerprint does.

use chrono::{DateTime, TimeZone, Utc};
use kernel::id::AccountId;
use platform::crypto::fingerprint;

use crate::domain::token::TokenPair;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshRecord {
    pub account_id: AccountId,
    /// `base64url(sha256(refresh_token))`
    pub token_digest: String,
    pub issued_at: DateTime<Utc>,
}

impl RefreshRecord {
    pub fn new(account_id: AccountId, refresh_token: &str, issued_at: DateTime<Utc>) -> Self {
        Self {
            account_id,
            token_digest: digest(refresh_token),
            issued_at,
        }
    }

    /// Record for the refresh half of a freshly issued pair
    pub fn for_pair(pair: &TokenPair) -> Self {
        let issued_at = Utc
            .timestamp_millis_opt(pair.issued_at_ms)
            .single()
            .unwrap_or_else(Utc::now);
        Self::new(pair.subject, &pair.refresh_token, issued_at)
    }
}

/// Storage digest of a presented refresh token
pub fn digest(refresh_token: &str) -> String {
    fingerprint(refresh_token)
}
