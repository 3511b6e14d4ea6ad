//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

use platform::cookie::CookieConfig;
use platform::crypto::random_bytes;
use platform::password::PasswordHashParams;

use crate::domain::token::TokenCodec;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Auth application configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC key for access tokens
    pub access_secret: Vec<u8>,
    /// HMAC key for refresh tokens, must differ from the access key
    pub refresh_secret: Vec<u8>,
    /// Access token TTL (30 minutes)
    pub access_token_ttl: Duration,
    /// Refresh token TTL (30 days); also the refresh cookie Max-Age
    pub refresh_token_ttl: Duration,
    /// Refresh cookie name
    pub refresh_cookie_name: String,
    /// Refresh cookie path scope
    pub refresh_cookie_path: String,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Argon2id cost
    pub password_hash: PasswordHashParams,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    /// Deadline for each use case
    pub operation_timeout: Duration,
}

/// Signing keys are fresh random bytes; tokens do not survive a restart
impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_secret: random_bytes(32),
            refresh_secret: random_bytes(32),
            access_token_ttl: Duration::from_secs(30 * 60),
            refresh_token_ttl: Duration::from_secs(30 * 24 * 3600),
            refresh_cookie_name: "refreshToken".to_string(),
            refresh_cookie_path: "/api".to_string(),
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            password_hash: PasswordHashParams::default(),
            password_pepper: None,
            operation_timeout: Duration::from_secs(5),
        }
    }
}

impl AuthConfig {
    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::default()
        }
    }

    /// Build the token codec for these keys and TTLs
    pub fn token_codec(&self) -> TokenCodec {
        TokenCodec::new(
            self.access_secret.clone(),
            self.refresh_secret.clone(),
            self.access_token_ttl,
            self.refresh_token_ttl,
        )
    }

    /// Refresh cookie attributes (Max-Age = refresh TTL)
    pub fn refresh_cookie(&self) -> CookieConfig {
        CookieConfig {
            name: self.refresh_cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: self.refresh_cookie_path.clone(),
            max_age_secs: Some(self.refresh_token_ttl.as_secs() as i64),
        }
    }

    /// Get access token TTL in seconds
    pub fn access_token_ttl_secs(&self) -> u64 {
        self.access_token_ttl.as_secs()
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("access_token_ttl", &self.access_token_ttl)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .field("refresh_cookie_name", &self.refresh_cookie_name)
            .field("refresh_cookie_path", &self.refresh_cookie_path)
            .field("cookie_secure", &self.cookie_secure)
            .field("cookie_same_site", &self.cookie_same_site)
            .field("password_hash", &self.password_hash)
            .field("password_pepper", &self.password_pepper.as_ref().map(|_| "[REDACTED]"))
            .field("operation_timeout", &self.operation_timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AuthConfig::default();
        assert_eq!(config.access_token_ttl_secs(), 1800);
        assert_eq!(config.refresh_token_ttl, Duration::from_secs(2_592_000));
        assert_ne!(config.access_secret, config.refresh_secret);
        assert_eq!(config.operation_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_default_keys_are_random() {
        let config = AuthConfig::default();
        assert_eq!(config.access_secret.len(), 32);
        assert_ne!(config.access_secret, config.refresh_secret);
        assert_ne!(config.access_secret, vec![0u8; 32]);
        assert_ne!(config.access_secret, AuthConfig::default().access_secret);
    }

    #[test]
    fn test_refresh_cookie_attributes() {
        let cookie = AuthConfig::development().refresh_cookie();
        assert_eq!(cookie.name, "refreshToken");
        assert_eq!(cookie.path, "/api");
        assert!(cookie.http_only);
        assert!(!cookie.secure);
        assert_eq!(cookie.max_age_secs, Some(2_592_000));
    }

    #[test]
    fn test_debug_hides_secrets() {
        let config = AuthConfig {
            password_pepper: Some(b"pepper!".to_vec()),
            ..AuthConfig::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("pepper!"));
        assert!(!debug.contains("access_secret"));
    }
}
