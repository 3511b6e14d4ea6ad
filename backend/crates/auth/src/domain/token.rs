//! Bearer Token Codec
//!
//! Compact self-describing tokens:
//!
//! ```text
//! base64url(JSON {"sub": i64, "iat": ms, "exp": ms}) "." base64url(HMAC-SHA256(key, encoded claims))
//! ```
//!
//! Access and refresh tokens are signed with different keys, so one kind can
//! never be replayed as the other.
//!
//! Verification has three outcomes and keeps them apart:
//! - `Ok(claims)`: signature valid and `now < exp`
//! - `Err(TokenError::Expired { subject })`: signature valid, `now >= exp`
//! - `Err(TokenError::Invalid)`: anything else, no identity is revealed
//!
//! The MAC is checked before the claims are even decoded.

use std::fmt;
use std::time::Duration;

use chrono::Utc;
use derive_more::Display;
use hmac::{Hmac, Mac};
use kernel::id::AccountId;
use platform::crypto::{from_base64url, to_base64url};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;
use zeroize::Zeroizing;

type HmacSha256 = Hmac<Sha256>;

/// Which key and TTL a token is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum TokenKind {
    #[display("access")]
    Access,
    #[display("refresh")]
    Refresh,
}

/// Signed token payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (account id)
    pub sub: i64,
    /// Issued at, unix milliseconds
    pub iat: i64,
    /// Expires at, unix milliseconds
    pub exp: i64,
}

impl TokenClaims {
    pub fn subject(&self) -> AccountId {
        AccountId::new(self.sub)
    }

    /// Expired at the exact expiry instant, not after it
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        now_ms >= self.exp
    }
}

/// Token verification/signing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Malformed, wrongly encoded or signed with another key
    #[error("token is malformed or its signature does not match")]
    Invalid,

    /// Authentic but past `exp`; the subject is still readable
    #[error("token expiration date has passed")]
    Expired { subject: AccountId },

    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Sign claims with `key`
pub fn sign_token(claims: &TokenClaims, key: &[u8]) -> Result<String, TokenError> {
    let payload =
        serde_json::to_vec(claims).map_err(|e| TokenError::Signing(e.to_string()))?;
    let encoded = to_base64url(&payload);

    let mut mac =
        HmacSha256::new_from_slice(key).map_err(|e| TokenError::Signing(e.to_string()))?;
    mac.update(encoded.as_bytes());
    let signature = mac.finalize().into_bytes();

    Ok(format!("{}.{}", encoded, to_base64url(&signature)))
}

/// Verify `token` with `key` as of `now_ms`
pub fn verify_token(token: &str, key: &[u8], now_ms: i64) -> Result<TokenClaims, TokenError> {
    let (encoded, signature_b64) = token.split_once('.').ok_or(TokenError::Invalid)?;
    if encoded.is_empty() || signature_b64.is_empty() {
        return Err(TokenError::Invalid);
    }

    let signature = from_base64url(signature_b64).map_err(|_| TokenError::Invalid)?;
    let mut mac = HmacSha256::new_from_slice(key).map_err(|_| TokenError::Invalid)?;
    mac.update(encoded.as_bytes());
    mac.verify_slice(&signature)
        .map_err(|_| TokenError::Invalid)?;

    // Authentic from here on
    let payload = from_base64url(encoded).map_err(|_| TokenError::Invalid)?;
    let claims: TokenClaims = serde_json::from_slice(&payload).map_err(|_| TokenError::Invalid)?;

    if claims.is_expired_at(now_ms) {
        return Err(TokenError::Expired {
            subject: claims.subject(),
        });
    }

    Ok(claims)
}

/// Freshly issued access + refresh tokens
///
/// Only ever built whole: if either signature fails nothing is returned.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub subject: AccountId,
    pub access_token: String,
    pub refresh_token: String,
    pub issued_at_ms: i64,
    pub access_expires_at_ms: i64,
    pub refresh_expires_at_ms: i64,
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("subject", &self.subject)
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("access_expires_at_ms", &self.access_expires_at_ms)
            .field("refresh_expires_at_ms", &self.refresh_expires_at_ms)
            .finish()
    }
}

/// Issues and verifies both token kinds
#[derive(Clone)]
pub struct TokenCodec {
    access_key: Zeroizing<Vec<u8>>,
    refresh_key: Zeroizing<Vec<u8>>,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenCodec {
    pub fn new(
        access_key: impl Into<Vec<u8>>,
        refresh_key: impl Into<Vec<u8>>,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Self {
        Self {
            access_key: Zeroizing::new(access_key.into()),
            refresh_key: Zeroizing::new(refresh_key.into()),
            access_ttl,
            refresh_ttl,
        }
    }

    fn key(&self, kind: TokenKind) -> &[u8] {
        match kind {
            TokenKind::Access => &self.access_key,
            TokenKind::Refresh => &self.refresh_key,
        }
    }

    pub fn ttl(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        }
    }

    fn ttl_ms(&self, kind: TokenKind) -> i64 {
        i64::try_from(self.ttl(kind).as_millis()).unwrap_or(i64::MAX)
    }

    /// Issue a token of `kind` for `subject` as of `now_ms`
    pub fn issue_at(
        &self,
        kind: TokenKind,
        subject: AccountId,
        now_ms: i64,
    ) -> Result<String, TokenError> {
        let claims = TokenClaims {
            sub: subject.value(),
            iat: now_ms,
            exp: now_ms.saturating_add(self.ttl_ms(kind)),
        };
        sign_token(&claims, self.key(kind))
    }

    pub fn issue(&self, kind: TokenKind, subject: AccountId) -> Result<String, TokenError> {
        self.issue_at(kind, subject, Utc::now().timestamp_millis())
    }

    pub fn verify_at(
        &self,
        kind: TokenKind,
        token: &str,
        now_ms: i64,
    ) -> Result<TokenClaims, TokenError> {
        verify_token(token, self.key(kind), now_ms)
    }

    pub fn verify(&self, kind: TokenKind, token: &str) -> Result<TokenClaims, TokenError> {
        self.verify_at(kind, token, Utc::now().timestamp_millis())
    }

    /// Issue both tokens for `subject`
    pub fn issue_pair_at(&self, subject: AccountId, now_ms: i64) -> Result<TokenPair, TokenError> {
        let access_token = self.issue_at(TokenKind::Access, subject, now_ms)?;
        let refresh_token = self.issue_at(TokenKind::Refresh, subject, now_ms)?;

        Ok(TokenPair {
            subject,
            access_token,
            refresh_token,
            issued_at_ms: now_ms,
            access_expires_at_ms: now_ms.saturating_add(self.ttl_ms(TokenKind::Access)),
            refresh_expires_at_ms: now_ms.saturating_add(self.ttl_ms(TokenKind::Refresh)),
        })
    }

    pub fn issue_pair(&self, subject: AccountId) -> Result<TokenPair, TokenError> {
        self.issue_pair_at(subject, Utc::now().timestamp_millis())
    }
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("access_key", &"[REDACTED]")
            .field("refresh_key", &"[REDACTED]")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}
