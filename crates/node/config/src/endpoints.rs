//! Remote endpoint setups.
//!
//! Each setup describes how to reach one remote data source and validates its own shape.
//! Whether a setup is required at all is decided by the aggregate [`crate::Config`].

use std::{fmt, time::Duration};

use alloy_primitives::B256;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Upper bound on batched L1 RPC calls.
pub const MAX_BATCH_RPC_CALLS: usize = 500;

/// Upper bound on the L1 receipts/header cache.
pub const MAX_L1_CACHE_SIZE: u64 = 10_000;

/// A remote endpoint that can validate its own configuration.
pub trait EndpointSetup {
    /// Validates the endpoint shape without contacting it.
    fn check(&self) -> Result<(), EndpointError>;
}

/// Provider flavour of an L1 RPC.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RpcKind {
    /// Plain `eth_getTransactionReceipt` per transaction.
    #[default]
    Basic,
    /// Let the client pick the best method.
    Any,
    /// `eth_getBlockReceipts`.
    Standard,
    /// Alchemy's `alchemy_getTransactionReceipts`.
    Alchemy,
    /// QuickNode's `qn_getBlockWithReceipts`.
    Quicknode,
    /// Erigon's `erigon_getBlockReceiptsByBlockHash`.
    Erigon,
    /// `debug_getRawReceipts`.
    Debug,
}

/// L1 execution RPC endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct L1EndpointConfig {
    /// RPC URL.
    pub url: String,
    /// Skip verification of data returned by the RPC.
    pub trust_rpc: bool,
    /// Provider flavour, selects the receipts fetching method.
    pub rpc_kind: RpcKind,
    /// Requests per second, 0 disables rate limiting.
    pub rate_limit: f64,
    /// Maximum requests in a burst.
    pub rate_limit_burst: u32,
    /// Maximum RPC calls per batch (default: 20).
    pub batch_size: usize,
    /// Maximum concurrent requests (default: 10).
    pub max_concurrency: usize,
    /// Receipts and header cache size (default: 900).
    pub cache_size: u64,
    /// Polling interval for new heads when subscriptions are unavailable (default: 12s).
    pub http_poll_interval: Duration,
}

impl Default for L1EndpointConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            trust_rpc: false,
            rpc_kind: RpcKind::default(),
            rate_limit: 0.0,
            rate_limit_burst: 10,
            batch_size: 20,
            max_concurrency: 10,
            cache_size: 900,
            http_poll_interval: Duration::from_secs(12),
        }
    }
}

impl L1EndpointConfig {
    /// Creates a config for `url` with default client settings.
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into(), ..Default::default() }
    }
}

impl EndpointSetup for L1EndpointConfig {
    fn check(&self) -> Result<(), EndpointError> {
        parse_endpoint("L1 RPC", &self.url, EndpointScheme::Rpc)?;
        if self.batch_size < 1 || self.batch_size > MAX_BATCH_RPC_CALLS {
            return Err(EndpointError::InvalidBatchSize(self.batch_size));
        }
        if !self.rate_limit.is_finite() || self.rate_limit < 0.0 {
            return Err(EndpointError::InvalidRateLimit(self.rate_limit));
        }
        if self.max_concurrency < 1 {
            return Err(EndpointError::InvalidMaxConcurrency(self.max_concurrency));
        }
        if self.cache_size > MAX_L1_CACHE_SIZE {
            return Err(EndpointError::CacheTooLarge(self.cache_size));
        }
        Ok(())
    }
}

/// L2 engine API endpoint.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct L2EndpointConfig {
    /// Engine API URL.
    pub engine_url: String,
    /// Shared JWT secret for the engine API.
    pub jwt_secret: B256,
}

impl L2EndpointConfig {
    /// Creates a config for `engine_url` authenticated with `jwt_secret`.
    pub fn new(engine_url: impl Into<String>, jwt_secret: B256) -> Self {
        Self { engine_url: engine_url.into(), jwt_secret }
    }
}

impl fmt::Debug for L2EndpointConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("L2EndpointConfig")
            .field("engine_url", &self.engine_url)
            .field("jwt_secret", &"<redacted>")
            .finish()
    }
}

impl EndpointSetup for L2EndpointConfig {
    fn check(&self) -> Result<(), EndpointError> {
        parse_endpoint("L2 engine", &self.engine_url, EndpointScheme::Rpc)?;
        if self.jwt_secret.is_zero() {
            return Err(EndpointError::EmptyJwtSecret);
        }
        Ok(())
    }
}

/// L1 beacon API endpoint, the source of blob sidecars.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct L1BeaconEndpointConfig {
    /// Beacon API URL.
    pub url: String,
    /// Beacon APIs tried when the primary fails.
    pub fallback_urls: Vec<String>,
    /// Fetch all sidecars of a block rather than only the needed indices.
    pub fetch_all_sidecars: bool,
    /// Skip the startup connectivity check.
    pub ignore_beacon_check: bool,
}

impl L1BeaconEndpointConfig {
    /// Creates a config for `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into(), ..Default::default() }
    }
}

impl EndpointSetup for L1BeaconEndpointConfig {
    fn check(&self) -> Result<(), EndpointError> {
        parse_endpoint("L1 beacon API", &self.url, EndpointScheme::Http)?;
        for fallback in &self.fallback_urls {
            parse_endpoint("L1 beacon API fallback", fallback, EndpointScheme::Http)?;
        }
        Ok(())
    }
}

/// Supervisor RPC endpoint used for cross-chain verification.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupervisorEndpointConfig {
    /// Supervisor RPC URL.
    pub url: String,
    /// Optional JWT secret for authenticated supervisor RPC.
    pub jwt_secret: Option<B256>,
}

impl SupervisorEndpointConfig {
    /// Creates an unauthenticated config for `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into(), jwt_secret: None }
    }
}

impl fmt::Debug for SupervisorEndpointConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupervisorEndpointConfig")
            .field("url", &self.url)
            .field("jwt_secret", &self.jwt_secret.map(|_| "<redacted>"))
            .finish()
    }
}

impl EndpointSetup for SupervisorEndpointConfig {
    fn check(&self) -> Result<(), EndpointError> {
        parse_endpoint("supervisor RPC", &self.url, EndpointScheme::Rpc)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
enum EndpointScheme {
    /// http, https, ws or wss
    Rpc,
    /// http or https
    Http,
}

impl EndpointScheme {
    fn allows(self, scheme: &str) -> bool {
        match self {
            Self::Rpc => matches!(scheme, "http" | "https" | "ws" | "wss"),
            Self::Http => matches!(scheme, "http" | "https"),
        }
    }
}

fn parse_endpoint(
    endpoint: &'static str,
    url: &str,
    allowed: EndpointScheme,
) -> Result<Url, EndpointError> {
    if url.trim().is_empty() {
        return Err(EndpointError::Empty(endpoint));
    }
    let parsed = Url::parse(url)
        .map_err(|source| EndpointError::InvalidUrl { endpoint, url: url.to_string(), source })?;
    if !allowed.allows(parsed.scheme()) {
        return Err(EndpointError::UnsupportedScheme {
            endpoint,
            scheme: parsed.scheme().to_string(),
        });
    }
    Ok(parsed)
}

/// Endpoint configuration errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EndpointError {
    /// No address configured.
    #[error("empty {0} address")]
    Empty(&'static str),

    /// The address does not parse.
    #[error("invalid {endpoint} address {url:?}: {source}")]
    InvalidUrl {
        /// Endpoint kind.
        endpoint: &'static str,
        /// The configured address.
        url: String,
        /// Parse failure.
        #[source]
        source: url::ParseError,
    },

    /// The address scheme is not supported by this endpoint.
    #[error("unsupported scheme {scheme:?} for {endpoint} address")]
    UnsupportedScheme {
        /// Endpoint kind.
        endpoint: &'static str,
        /// The configured scheme.
        scheme: String,
    },

    /// RPC batch size outside `1..=MAX_BATCH_RPC_CALLS`.
    #[error("batch size is invalid or unreasonable: {0}")]
    InvalidBatchSize(usize),

    /// Negative or non-finite rate limit.
    #[error("rate limit must be a non-negative number, got {0}")]
    InvalidRateLimit(f64),

    /// Concurrency below one.
    #[error("max concurrent requests cannot be less than 1, was {0}")]
    InvalidMaxConcurrency(usize),

    /// Cache larger than `MAX_L1_CACHE_SIZE`.
    #[error("cache size is dangerously large: {0}")]
    CacheTooLarge(u64),

    /// The engine JWT secret is all zeroes.
    #[error("empty L2 engine JWT secret")]
    EmptyJwtSecret,
}
