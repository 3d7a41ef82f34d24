//! Store connection settings.
//!
//! Loaded from the environment by default:
//!
//! | Variable                | Required | Default |
//! |-------------------------|----------|---------|
//! | `MENU_STORE_URL`        | yes      |         |
//! | `MENU_STORE_KEY`        | yes      |         |
//! | `MENU_STORE_TIMEOUT_MS` | no       | `10000` |

use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use tracing::{info, warn};

pub const URL_VAR: &str = "MENU_STORE_URL";
pub const KEY_VAR: &str = "MENU_STORE_KEY";
pub const TIMEOUT_VAR: &str = "MENU_STORE_TIMEOUT_MS";

const DEFAULT_TIMEOUT_MS: &str = "10000";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(String),
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// Where the hosted row store lives and how to talk to it.
#[derive(Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Project base URL, without the `/rest/v1` suffix.
    pub url: String,
    /// Publishable API key, sent as `apikey` and bearer token.
    pub api_key: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("url", &self.url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl StoreConfig {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            timeout: Duration::from_millis(10_000),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = required(&lookup, URL_VAR)?;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Invalid(
                URL_VAR.into(),
                format!("expected an http(s) URL, got {url:?}"),
            ));
        }

        let api_key = required(&lookup, KEY_VAR)?;
        let timeout_ms: u64 = try_load(&lookup, TIMEOUT_VAR, DEFAULT_TIMEOUT_MS)?;

        Ok(Self {
            url,
            api_key,
            timeout: Duration::from_millis(timeout_ms),
        })
    }
}

fn required<F>(lookup: &F, key: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            warn!("{key} not set");
            ConfigError::Missing(key.to_string())
        })
}

fn try_load<F, T>(lookup: &F, key: &str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    lookup(key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .trim()
        .parse()
        .map_err(|e: T::Err| {
            warn!("Invalid {key} value: {e}");
            ConfigError::Invalid(key.to_string(), e.to_string())
        })
}
