//! Cooperative shutdown.

use std::sync::{Arc, OnceLock};

use keel_chainspec::ProtocolVersion;
use thiserror::Error;
use tokio::sync::watch;

use crate::HaltSeverity;

/// Why the node was asked to shut down.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CancelCause {
    /// The chain requires a protocol version this node is not prepared for.
    #[error(
        "protocol halt: local version {local} is {severity} behind required version {required}"
    )]
    ProtocolHalt {
        /// Version this node runs.
        local: ProtocolVersion,
        /// Version signalled on chain.
        required: ProtocolVersion,
        /// How far behind the node is.
        severity: HaltSeverity,
    },

    /// Shutdown requested by an operator or another component.
    #[error("shutdown requested: {0}")]
    Requested(String),
}

#[derive(Debug)]
struct Inner {
    cause: OnceLock<CancelCause>,
    signal: watch::Sender<bool>,
}

/// A single-fire shutdown signal that carries its cause.
///
/// Clones observe the same signal. Only the first [`CancelHandle::cancel`] records a cause.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    inner: Arc<Inner>,
}

impl Default for CancelHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelHandle {
    /// Creates a handle that has not fired.
    pub fn new() -> Self {
        let (signal, _) = watch::channel(false);
        Self { inner: Arc::new(Inner { cause: OnceLock::new(), signal }) }
    }

    /// Fires the handle. Returns false if it had already fired.
    pub fn cancel(&self, cause: CancelCause) -> bool {
        if self.inner.cause.set(cause).is_err() {
            return false;
        }
        self.inner.signal.send_replace(true);
        true
    }

    /// Returns true once the handle has fired.
    pub fn is_cancelled(&self) -> bool {
        self.inner.cause.get().is_some()
    }

    /// The recorded cause, if the handle has fired.
    pub fn cause(&self) -> Option<&CancelCause> {
        self.inner.cause.get()
    }

    /// Resolves once the handle has fired.
    pub async fn cancelled(&self) {
        let mut rx = self.inner.signal.subscribe();
        // The sender lives in `inner`, so the channel cannot close while `self` is alive.
        let _ = rx.wait_for(|fired| *fired).await;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn first_cancel_wins() {
        let handle = CancelHandle::new();
        assert!(!handle.is_cancelled());
        assert!(handle.cause().is_none());

        assert!(handle.cancel(CancelCause::Requested("first".into())));
        assert!(!handle.cancel(CancelCause::Requested("second".into())));
        assert_eq!(handle.cause(), Some(&CancelCause::Requested("first".into())));
    }

    #[tokio::test]
    async fn clones_observe_cancellation() {
        let handle = CancelHandle::new();
        let clone = handle.clone();

        let waiter = tokio::spawn(async move { clone.cancelled().await });
        handle.cancel(CancelCause::Requested("operator".into()));

        tokio::time::timeout(Duration::from_secs(1), waiter).await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn cancelled_resolves_after_the_fact() {
        let handle = CancelHandle::new();
        handle.cancel(CancelCause::Requested("early".into()));
        tokio::time::timeout(Duration::from_secs(1), handle.cancelled()).await.unwrap();
    }

    #[test]
    fn cause_display() {
        let cause = CancelCause::ProtocolHalt {
            local: ProtocolVersion::new(1, 0, 0),
            required: ProtocolVersion::new(2, 0, 0),
            severity: HaltSeverity::Major,
        };
        assert_eq!(
            cause.to_string(),
            "protocol halt: local version v1.0.0 is major behind required version v2.0.0"
        );
    }
}
