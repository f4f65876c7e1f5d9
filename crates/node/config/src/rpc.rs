//! RPC and metrics listeners.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Highest valid TCP port.
const MAX_PORT: i32 = u16::MAX as i32;

/// Node RPC server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RpcConfig {
    /// Listen address (default: 127.0.0.1).
    pub listen_addr: String,
    /// Listen port (default: 9545).
    pub listen_port: u16,
    /// Expose the admin namespace.
    pub enable_admin: bool,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self { listen_addr: "127.0.0.1".to_string(), listen_port: 9545, enable_admin: false }
    }
}

impl RpcConfig {
    /// HTTP URL the server listens on.
    pub fn http_endpoint(&self) -> String {
        format!("http://{}:{}", self.listen_addr, self.listen_port)
    }
}

/// Prometheus metrics server.
///
/// The port is signed so that out-of-range values from the command line surface as a
/// configuration error instead of a parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Serve metrics.
    pub enabled: bool,
    /// Listen address (default: 0.0.0.0).
    pub listen_addr: String,
    /// Listen port (default: 7300).
    pub listen_port: i32,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: false, listen_addr: "0.0.0.0".to_string(), listen_port: 7300 }
    }
}

impl MetricsConfig {
    /// Creates an enabled metrics config on `listen_port`.
    pub fn enabled(listen_port: i32) -> Self {
        Self { enabled: true, listen_port, ..Default::default() }
    }

    /// Validates the listen port when enabled.
    pub const fn check(&self) -> Result<(), MetricsConfigError> {
        if self.enabled && !is_valid_port(self.listen_port) {
            return Err(MetricsConfigError::InvalidPort(self.listen_port));
        }
        Ok(())
    }
}

/// Returns true for ports in `0..=65535`.
pub(crate) const fn is_valid_port(port: i32) -> bool {
    port >= 0 && port <= MAX_PORT
}

/// Metrics configuration errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MetricsConfigError {
    /// Port outside `0..=65535`.
    #[error("invalid metrics port: {0}")]
    InvalidPort(i32),
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0, true)]
    #[case(7300, true)]
    #[case(65535, true)]
    #[case(65536, false)]
    #[case(-1, false)]
    fn metrics_port_bounds(#[case] port: i32, #[case] valid: bool) {
        let result = MetricsConfig::enabled(port).check();
        assert_eq!(result.is_ok(), valid);
        if !valid {
            assert_eq!(result, Err(MetricsConfigError::InvalidPort(port)));
        }
    }

    #[rstest]
    #[case(-1)]
    #[case(65536)]
    #[case(i32::MAX)]
    fn disabled_metrics_ignore_port(#[case] port: i32) {
        let config = MetricsConfig { listen_port: port, ..Default::default() };
        assert_eq!(config.check(), Ok(()));
    }

    #[test]
    fn rpc_http_endpoint() {
        assert_eq!(RpcConfig::default().http_endpoint(), "http://127.0.0.1:9545");
    }
}
