//! Client configuration.
//!
//! The backend base URL comes from the environment, falling back to a local
//! default. A TOML file may override individual settings; see
//! [`ConfigOverrides`].

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ApiError, Result};

/// Base URL used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";

/// Environment variable selecting the backend base URL.
pub const API_URL_ENV: &str = "HEADSHOT_API_URL";

/// Environment variable selecting a client-wide request timeout in seconds.
pub const TIMEOUT_ENV: &str = "HEADSHOT_API_TIMEOUT_SECS";

/// Settings for building an [`ApiClient`](crate::ApiClient).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Backend base URL, e.g. `http://localhost:8000/api/v1`.
    pub base_url: String,

    /// Client-wide request timeout. `None` leaves it to the transport.
    pub timeout_secs: Option<u64>,

    /// `User-Agent` header sent with every request.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_secs: None,
            user_agent: concat!("headshot-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    /// Configuration for the given base URL, everything else defaulted.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Read configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidConfig`] if a variable is set to an
    /// unparseable value.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            config.base_url = url.trim().to_string();
        }

        if let Some(raw) = lookup(TIMEOUT_ENV).filter(|v| !v.trim().is_empty()) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .map_err(|e| ApiError::InvalidConfig {
                    reason: format!("{TIMEOUT_ENV}={raw:?} is not a number of seconds: {e}"),
                })?;
            config.timeout_secs = Some(secs);
        }

        Ok(config)
    }

    /// Apply file or command-line overrides on top of this configuration.
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(url) = overrides.base_url {
            self.base_url = url;
        }
        if let Some(secs) = overrides.timeout_secs {
            self.timeout_secs = Some(secs);
        }
        if let Some(agent) = overrides.user_agent {
            self.user_agent = agent;
        }
        self
    }

    /// The client-wide timeout, if one is configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Parse and validate the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::UrlParse`] for malformed URLs and
    /// [`ApiError::InvalidConfig`] for non-HTTP schemes.
    pub fn parsed_base_url(&self) -> Result<Url> {
        let url = Url::parse(&self.base_url)?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ApiError::InvalidConfig {
                reason: format!("base url must be http or https, got {other}"),
            }),
        }
    }
}

/// Partial configuration, as read from a TOML file.
///
/// ```toml
/// base_url = "https://api.example.com/api/v1"
/// timeout_secs = 30
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigOverrides {
    /// Backend base URL.
    pub base_url: Option<String>,
    /// Client-wide timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// `User-Agent` header.
    pub user_agent: Option<String>,
}

impl ConfigOverrides {
    /// Parse overrides from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| ApiError::InvalidConfig {
            reason: format!("malformed config file: {e}"),
        })
    }

    /// Read overrides from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ApiError::InvalidConfig {
            reason: format!("cannot read {}: {e}", path.display()),
        })?;
        Self::from_toml_str(&text)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
