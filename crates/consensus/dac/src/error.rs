//! DAC error types.

use alloy_primitives::B256;
use thiserror::Error;

/// Local DAC configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DacConfigError {
    /// No committee members were given.
    #[error("dac.urls must contain at least one committee member")]
    EmptyUrls,

    /// A member URL does not parse.
    #[error("invalid DAC url {url:?}: {source}")]
    InvalidUrl {
        /// The offending entry.
        url: String,
        /// Parse failure.
        #[source]
        source: url::ParseError,
    },

    /// A member URL is not http(s).
    #[error("unsupported scheme {scheme:?} in DAC url {url:?}")]
    UnsupportedScheme {
        /// The offending entry.
        url: String,
        /// Its scheme.
        scheme: String,
    },
}

/// DAC client errors.
#[derive(Debug, Clone, Error)]
pub enum DacError {
    /// The member list is invalid.
    #[error(transparent)]
    Config(#[from] DacConfigError),

    /// The HTTP client could not be built.
    #[error("failed to build DAC http client: {0}")]
    Client(String),

    /// A request to a committee member failed.
    #[error("DAC request to {url} failed: {message}")]
    Http {
        /// Request URL.
        url: String,
        /// Transport failure.
        message: String,
    },

    /// A committee member answered with a non-success status.
    #[error("DAC member {url} returned status {status}")]
    Status {
        /// Request URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// No committee member returned data matching the commitment.
    #[error("blob {commitment} unavailable from {attempts} DAC members")]
    Unavailable {
        /// Requested commitment.
        commitment: B256,
        /// Number of members tried.
        attempts: usize,
    },
}
