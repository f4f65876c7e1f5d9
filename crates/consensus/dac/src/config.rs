//! DAC configuration.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{DacConfigError, DacError, HttpDacClient};

/// Committee members a sequencer posts L2 blobs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DacConfig {
    /// Member base URLs, in posting order.
    pub urls: Vec<String>,
}

impl DacConfig {
    /// Creates a config from a list of member URLs.
    pub fn new<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { urls: urls.into_iter().map(Into::into).collect() }
    }

    /// Builds a config from a comma separated list.
    ///
    /// An empty list means no committee is configured and yields `None`.
    pub fn from_comma_separated(urls: &str) -> Option<Self> {
        let urls: Vec<String> = urls
            .split(',')
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string)
            .collect();
        if urls.is_empty() { None } else { Some(Self { urls }) }
    }

    /// Validates the member list: non-empty, every entry an http(s) URL.
    pub fn check(&self) -> Result<(), DacConfigError> {
        if self.urls.is_empty() {
            return Err(DacConfigError::EmptyUrls);
        }
        for url in &self.urls {
            parse_member(url)?;
        }
        Ok(())
    }

    /// Binds a client to the committee.
    ///
    /// Returns `Ok(None)` when there are no members. No connection is attempted.
    pub fn client(&self) -> Result<Option<HttpDacClient>, DacError> {
        if self.urls.is_empty() {
            return Ok(None);
        }
        HttpDacClient::new(&self.urls).map(Some)
    }
}

pub(crate) fn parse_member(url: &str) -> Result<Url, DacConfigError> {
    let parsed = Url::parse(url)
        .map_err(|source| DacConfigError::InvalidUrl { url: url.to_string(), source })?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(DacConfigError::UnsupportedScheme {
            url: url.to_string(),
            scheme: scheme.to_string(),
        }),
    }
}
