//! High-availability leader coordination.

use std::{fmt::Debug, sync::Arc, time::Duration};

use async_trait::async_trait;
use thiserror::Error;

use crate::CancelHandle;

/// Resolves the RPC endpoint of the conductor that decides which sequencer leads.
#[async_trait]
pub trait ConductorRpc: Debug + Send + Sync {
    /// Returns the conductor RPC URL. Implementations should stop early once `cancel` fires.
    async fn endpoint(&self, cancel: &CancelHandle) -> Result<String, ConductorError>;
}

/// A [`ConductorRpc`] with a fixed address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticConductorRpc(String);

impl StaticConductorRpc {
    /// Creates a resolver that always returns `endpoint`.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self(endpoint.into())
    }
}

#[async_trait]
impl ConductorRpc for StaticConductorRpc {
    async fn endpoint(&self, _cancel: &CancelHandle) -> Result<String, ConductorError> {
        Ok(self.0.clone())
    }
}

/// Conductor coordination settings.
#[derive(Debug, Clone)]
pub struct ConductorConfig {
    /// Defer sequencing decisions to the conductor.
    pub enabled: bool,
    /// Endpoint resolver.
    pub rpc: Option<Arc<dyn ConductorRpc>>,
    /// Upper bound on resolving the endpoint (default: 1s).
    pub rpc_timeout: Duration,
}

impl Default for ConductorConfig {
    fn default() -> Self {
        Self { enabled: false, rpc: None, rpc_timeout: Duration::from_secs(1) }
    }
}

impl ConductorConfig {
    /// Creates an enabled config resolving through `rpc`.
    pub fn enabled(rpc: Arc<dyn ConductorRpc>) -> Self {
        Self { enabled: true, rpc: Some(rpc), ..Default::default() }
    }

    /// Sets the resolve timeout.
    pub const fn with_rpc_timeout(mut self, rpc_timeout: Duration) -> Self {
        self.rpc_timeout = rpc_timeout;
        self
    }

    /// Resolves the conductor endpoint, bounded by `rpc_timeout` and `cancel`.
    pub async fn resolve_endpoint(&self, cancel: &CancelHandle) -> Result<String, ConductorError> {
        if !self.enabled {
            return Err(ConductorError::Disabled);
        }
        let rpc = self.rpc.as_ref().ok_or(ConductorError::MissingRpc)?;

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ConductorError::Cancelled),
            res = tokio::time::timeout(self.rpc_timeout, rpc.endpoint(cancel)) => {
                res.map_err(|_| ConductorError::Timeout(self.rpc_timeout))?
            }
        }
    }
}

/// Conductor endpoint resolution errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConductorError {
    /// Coordination is not enabled.
    #[error("conductor is disabled")]
    Disabled,

    /// Enabled without a resolver.
    #[error("no conductor RPC resolver configured")]
    MissingRpc,

    /// The resolver did not answer in time.
    #[error("conductor RPC did not resolve within {0:?}")]
    Timeout(Duration),

    /// Shutdown began while resolving.
    #[error("conductor RPC resolution cancelled")]
    Cancelled,

    /// The resolver failed.
    #[error("conductor RPC unavailable: {0}")]
    Unavailable(String),
}
