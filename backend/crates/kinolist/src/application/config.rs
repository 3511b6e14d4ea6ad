//! Application Configuration

use std::time::Duration;

/// Public Kinopoisk API
pub const DEFAULT_CATALOG_URL: &str = "https://api.kinopoisk.dev";

/// Kinolist application configuration
#[derive(Clone)]
pub struct KinolistConfig {
    /// Catalog base URL, without a trailing slash
    pub catalog_base_url: String,
    /// Sent as `X-API-KEY`
    pub catalog_api_key: String,
    /// Per-request timeout for catalog calls
    pub catalog_timeout: Duration,
    /// Deadline for each use case
    pub operation_timeout: Duration,
}

impl Default for KinolistConfig {
    fn default() -> Self {
        Self {
            catalog_base_url: DEFAULT_CATALOG_URL.to_string(),
            catalog_api_key: String::new(),
            catalog_timeout: Duration::from_secs(4),
            operation_timeout: Duration::from_secs(5),
        }
    }
}

impl KinolistConfig {
    pub fn new(catalog_base_url: impl Into<String>, catalog_api_key: impl Into<String>) -> Self {
        Self {
            catalog_base_url: catalog_base_url.into().trim_end_matches('/').to_string(),
            catalog_api_key: catalog_api_key.into(),
            ..Default::default()
        }
    }
}

impl std::fmt::Debug for KinolistConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KinolistConfig")
            .field("catalog_base_url", &self.catalog_base_url)
            .field("catalog_api_key", &"[REDACTED]")
            .field("catalog_timeout", &self.catalog_timeout)
            .field("operation_timeout", &self.operation_timeout)
            .finish()
    }
}
