//! Startup configuration errors.

use keel_chainspec::RollupConfigError;
use keel_dac::DacConfigError;
use keel_persistence::PersistenceError;
use thiserror::Error;

use crate::{
    AltDaConfigError, EndpointError, MetricsConfigError, P2pConfigError, PprofConfigError,
};

/// The first invariant a [`crate::Config`] violates.
///
/// Every variant is fatal. [`ConfigError::subsystem`] names the part of the config at fault.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// L1 RPC endpoint is invalid.
    #[error("l1 endpoint config error: {0}")]
    L1Endpoint(#[source] EndpointError),

    /// L2 engine endpoint is invalid.
    #[error("l2 endpoint config error: {0}")]
    L2Endpoint(#[source] EndpointError),

    /// Ecotone is scheduled without a beacon endpoint.
    #[error(
        "the Ecotone upgrade is scheduled (timestamp = {ecotone_time}) but no L1 Beacon API endpoint is configured"
    )]
    MissingBeaconEndpoint {
        /// Ecotone activation time.
        ecotone_time: u64,
    },

    /// Beacon endpoint is invalid.
    #[error("misconfigured L1 Beacon API endpoint: {0}")]
    BeaconEndpoint(#[source] EndpointError),

    /// Interop is scheduled without a supervisor endpoint.
    #[error(
        "the Interop upgrade is scheduled (timestamp = {interop_time}) but no supervisor RPC endpoint is configured"
    )]
    MissingSupervisorEndpoint {
        /// Interop activation time.
        interop_time: u64,
    },

    /// Supervisor endpoint is invalid.
    #[error("misconfigured supervisor RPC endpoint: {0}")]
    SupervisorEndpoint(#[source] EndpointError),

    /// Rollup parameters are invalid.
    #[error("rollup config error: {0}")]
    Rollup(#[from] RollupConfigError),

    /// Metrics listener is invalid.
    #[error("metrics config error: {0}")]
    Metrics(#[from] MetricsConfigError),

    /// Profiling settings are invalid.
    #[error("pprof config error: {0}")]
    Pprof(#[from] PprofConfigError),

    /// P2P settings are invalid.
    #[error("p2p config error: {0}")]
    P2p(#[from] P2pConfigError),

    /// Unknown halt threshold name.
    #[error("invalid rollup halting option: {0:?}")]
    InvalidRollupHalt(String),

    /// Conductor enabled while a persisted sequencer state exists.
    #[error("config persistence must be disabled when conductor is enabled")]
    ConductorWithPersistence,

    /// Conductor enabled on a non-sequencer.
    #[error("sequencer must be enabled when conductor is enabled")]
    ConductorRequiresSequencer,

    /// Conductor enabled without an endpoint resolver.
    #[error("conductor rpc must be set when conductor is enabled")]
    ConductorRpcMissing,

    /// Persisted state could not be read.
    #[error("failed to read persisted sequencer state: {0}")]
    Persistence(#[from] PersistenceError),

    /// Alt-DA settings are invalid.
    #[error("altDA config error: {0}")]
    AltDa(#[from] AltDaConfigError),

    /// A blob-time sequencer has no committee.
    #[error("dac.urls must be set for sequencer when l2 blob time is set")]
    DacUrlsRequired,

    /// A committee is configured where it is not used.
    #[error("dac.urls can only be set for sequencer when l2 blob time is set")]
    DacUrlsNotAllowed,

    /// Committee settings are invalid.
    #[error("dac config error: {0}")]
    Dac(#[from] DacConfigError),
}

impl ConfigError {
    /// Name of the subsystem the error concerns.
    pub const fn subsystem(&self) -> &'static str {
        match self {
            Self::L1Endpoint(_) => "l1",
            Self::L2Endpoint(_) => "l2",
            Self::MissingBeaconEndpoint { .. } | Self::BeaconEndpoint(_) => "l1.beacon",
            Self::MissingSupervisorEndpoint { .. } | Self::SupervisorEndpoint(_) => "supervisor",
            Self::Rollup(_) => "rollup",
            Self::Metrics(_) => "metrics",
            Self::Pprof(_) => "pprof",
            Self::P2p(_) => "p2p",
            Self::InvalidRollupHalt(_) => "rollup.halt",
            Self::ConductorWithPersistence
            | Self::ConductorRequiresSequencer
            | Self::ConductorRpcMissing
            | Self::Persistence(_) => "conductor",
            Self::AltDa(_) => "altda",
            Self::DacUrlsRequired | Self::DacUrlsNotAllowed | Self::Dac(_) => "dac",
        }
    }
}
