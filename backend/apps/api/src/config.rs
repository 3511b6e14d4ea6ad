//! Server configuration from the environment
//!
//! Every value has a development default except the two token keys, which
//! release builds require.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, bail};
use auth::AuthConfig;
use base64::Engine;
use base64::engine::general_purpose;
use kinolist::KinolistConfig;
use kinolist::application::config::DEFAULT_CATALOG_URL;
use platform::password::PasswordHashParams;

const DEFAULT_LISTEN_ADDR: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 8080));
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";
const MIN_KEY_BYTES: usize = 32;

/// Everything the binary needs to start
#[derive(Debug)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
    /// `None` runs on in-memory stores (debug builds only)
    pub database_url: Option<String>,
    pub frontend_origins: Vec<String>,
    pub auth: AuthConfig,
    pub kinolist: KinolistConfig,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok(), cfg!(debug_assertions))
    }

    /// `lookup` returns the raw value of a variable, if set
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        debug_build: bool,
    ) -> anyhow::Result<Self> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let listen_addr = parse_or(&get, "LISTEN_ADDR", DEFAULT_LISTEN_ADDR)?;
        let database_url = get("DATABASE_URL");
        if database_url.is_none() && !debug_build {
            bail!("DATABASE_URL must be set in release builds");
        }

        let frontend_origins = get("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let base = if debug_build {
            AuthConfig::development()
        } else {
            AuthConfig::default()
        };

        let access_secret = match get("JWT_ACCESS_SECRET_KEY") {
            Some(raw) => decode_key("JWT_ACCESS_SECRET_KEY", &raw)?,
            None if debug_build => base.access_secret.clone(),
            None => bail!("JWT_ACCESS_SECRET_KEY must be set in release builds"),
        };
        let refresh_secret = match get("JWT_REFRESH_SECRET_KEY") {
            Some(raw) => decode_key("JWT_REFRESH_SECRET_KEY", &raw)?,
            None if debug_build => base.refresh_secret.clone(),
            None => bail!("JWT_REFRESH_SECRET_KEY must be set in release builds"),
        };
        if access_secret == refresh_secret {
            bail!("JWT_ACCESS_SECRET_KEY and JWT_REFRESH_SECRET_KEY must differ");
        }

        let default_hash = PasswordHashParams::default();
        let password_hash = PasswordHashParams {
            memory_kib: parse_or(&get, "PASSWORD_HASH_MEMORY_KIB", default_hash.memory_kib)?,
            iterations: parse_or(&get, "PASSWORD_HASH_ITERATIONS", default_hash.iterations)?,
            parallelism: parse_or(&get, "PASSWORD_HASH_PARALLELISM", default_hash.parallelism)?,
        };
        password_hash
            .validate()
            .map_err(|e| anyhow::anyhow!("invalid PASSWORD_HASH_* settings: {e}"))?;

        let operation_timeout = Duration::from_secs(parse_or(
            &get,
            "OPERATION_TIMEOUT_SECS",
            base.operation_timeout.as_secs(),
        )?);

        let auth = AuthConfig {
            access_secret,
            refresh_secret,
            access_token_ttl: Duration::from_secs(parse_or(
                &get,
                "ACCESS_TOKEN_TTL_SECS",
                base.access_token_ttl.as_secs(),
            )?),
            refresh_token_ttl: Duration::from_secs(parse_or(
                &get,
                "REFRESH_TOKEN_TTL_SECS",
                base.refresh_token_ttl.as_secs(),
            )?),
            refresh_cookie_path: get("REFRESH_COOKIE_PATH")
                .unwrap_or_else(|| base.refresh_cookie_path.clone()),
            cookie_secure: parse_or(&get, "COOKIE_SECURE", base.cookie_secure)?,
            password_hash,
            password_pepper: get("PASSWORD_PEPPER").map(String::into_bytes),
            operation_timeout,
            ..base
        };
        if auth.access_token_ttl >= auth.refresh_token_ttl {
            bail!("ACCESS_TOKEN_TTL_SECS must be shorter than REFRESH_TOKEN_TTL_SECS");
        }

        let kinolist = KinolistConfig {
            operation_timeout,
            ..KinolistConfig::new(
                get("KINOPOISK_API_URL").unwrap_or_else(|| DEFAULT_CATALOG_URL.to_string()),
                get("KINOPOISK_API_KEY").unwrap_or_default(),
            )
        };
        if kinolist.catalog_api_key.is_empty() {
            tracing::warn!("KINOPOISK_API_KEY is not set; catalog calls will be rejected upstream");
        }

        Ok(Self {
            listen_addr,
            database_url,
            frontend_origins,
            auth,
            kinolist,
        })
    }
}

/// Parse `name` if set, else take the default
fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} has an invalid value")),
        None => Ok(default),
    }
}

/// Keys are base64 (standard alphabet) of at least 32 random bytes
fn decode_key(name: &str, raw: &str) -> anyhow::Result<Vec<u8>> {
    let key = general_purpose::STANDARD
        .decode(raw.trim())
        .with_context(|| format!("{name} must be base64"))?;
    if key.len() < MIN_KEY_BYTES {
        bail!("{name} must decode to at least {MIN_KEY_BYTES} bytes");
    }
    Ok(key)
}
