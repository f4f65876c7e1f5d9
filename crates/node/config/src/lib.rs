#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/refcell/keel/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod altda;
pub use altda::{AltDaConfig, AltDaConfigError};

mod cancel;
pub use cancel::{CancelCause, CancelHandle};

mod check;

mod conductor;
pub use conductor::{ConductorConfig, ConductorError, ConductorRpc, StaticConductorRpc};

mod config;
pub use config::{Config, ConfigBuilder};

mod driver;
pub use driver::{DriverConfig, SequencerStoppedFlag};

mod endpoints;
pub use endpoints::{
    EndpointError, EndpointSetup, L1BeaconEndpointConfig, L1EndpointConfig, L2EndpointConfig,
    MAX_BATCH_RPC_CALLS, MAX_L1_CACHE_SIZE, RpcKind, SupervisorEndpointConfig,
};

mod error;
pub use error::ConfigError;

mod halt;
pub use halt::HaltSeverity;

mod p2p;
pub use p2p::{P2pConfig, P2pConfigError, P2pSignerConfig};

mod pprof;
pub use pprof::{PprofConfig, PprofConfigError, ProfileType};

mod rpc;
pub use rpc::{MetricsConfig, MetricsConfigError, RpcConfig};

mod sync;
pub use sync::{SyncConfig, SyncMode};
