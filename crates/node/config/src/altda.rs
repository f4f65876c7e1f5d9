//! Alternative data availability configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Settings for posting batch data to an external DA server instead of L1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AltDaConfig {
    /// Use the DA server.
    pub enabled: bool,
    /// DA server base URL.
    pub da_server_url: Option<String>,
    /// Verify the commitment of data read back from the server (default: true).
    pub verify_on_read: bool,
    /// Server computes commitments itself, Keccak commitments are not used.
    pub generic_da: bool,
    /// Timeout for storing data (default: 30s).
    pub put_timeout: Duration,
    /// Timeout for fetching data (default: 30s).
    pub get_timeout: Duration,
    /// Maximum concurrent requests to the server (default: 1).
    pub max_concurrent_requests: u64,
}

impl Default for AltDaConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            da_server_url: None,
            verify_on_read: true,
            generic_da: false,
            put_timeout: Duration::from_secs(30),
            get_timeout: Duration::from_secs(30),
            max_concurrent_requests: 1,
        }
    }
}

impl AltDaConfig {
    /// Creates an enabled config against `da_server_url`.
    pub fn enabled(da_server_url: impl Into<String>) -> Self {
        Self { enabled: true, da_server_url: Some(da_server_url.into()), ..Default::default() }
    }

    /// Validates the server settings. A disabled config is always valid.
    pub fn check(&self) -> Result<(), AltDaConfigError> {
        if !self.enabled {
            return Ok(());
        }
        let url = match self.da_server_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => url,
            _ => return Err(AltDaConfigError::MissingServerUrl),
        };
        let parsed = Url::parse(url)
            .map_err(|source| AltDaConfigError::InvalidServerUrl { url: url.to_string(), source })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(AltDaConfigError::UnsupportedScheme(parsed.scheme().to_string()));
        }
        if self.max_concurrent_requests < 1 {
            return Err(AltDaConfigError::InvalidConcurrency);
        }
        Ok(())
    }
}

/// Alt-DA configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AltDaConfigError {
    /// Enabled without a server.
    #[error("DA server URL is required when altDA is enabled")]
    MissingServerUrl,

    /// Server URL does not parse.
    #[error("invalid DA server URL {url:?}: {source}")]
    InvalidServerUrl {
        /// Configured URL.
        url: String,
        /// Parse failure.
        #[source]
        source: url::ParseError,
    },

    /// Server URL is not http(s).
    #[error("DA server URL must be http or https, got {0:?}")]
    UnsupportedScheme(String),

    /// Concurrency below one.
    #[error("max concurrent DA requests must be at least 1")]
    InvalidConcurrency,
}
