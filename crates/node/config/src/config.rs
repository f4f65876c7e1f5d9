//! The aggregate node configuration.

use std::{path::PathBuf, sync::Arc, time::Duration};

use keel_chainspec::RollupConfig;
use keel_dac::{DacClient, DacConfig, DacError};
use keel_persistence::{ConfigPersistence, DisabledConfigPersistence};

use crate::{
    AltDaConfig, CancelHandle, ConductorConfig, DriverConfig, HaltSeverity,
    L1BeaconEndpointConfig, L1EndpointConfig, L2EndpointConfig, MetricsConfig, P2pConfig,
    P2pSignerConfig, PprofConfig, RpcConfig, SupervisorEndpointConfig, SyncConfig,
};

/// Everything a rollup node needs to start.
///
/// Populate it, run [`Config::load_persisted`], then [`Config::check`]. Only a config that
/// passed the check should be handed to the node's subsystems.
#[derive(Debug, Clone)]
pub struct Config {
    /// L1 execution RPC.
    pub l1: L1EndpointConfig,
    /// L2 engine API.
    pub l2: L2EndpointConfig,
    /// L1 beacon API, required once Ecotone is scheduled.
    pub beacon: Option<L1BeaconEndpointConfig>,
    /// Supervisor RPC, required once Interop is scheduled.
    pub supervisor: Option<SupervisorEndpointConfig>,
    /// Chain parameters and upgrade schedule.
    pub rollup: RollupConfig,
    /// Derivation and sequencing driver.
    pub driver: DriverConfig,
    /// Networking, `None` disables it.
    pub p2p: Option<P2pConfig>,
    /// Node RPC server.
    pub rpc: RpcConfig,
    /// Metrics server.
    pub metrics: MetricsConfig,
    /// Profiling.
    pub pprof: PprofConfig,
    /// Sync strategy.
    pub sync: SyncConfig,
    /// How often the L1 head is polled for new epochs (default: 12s).
    pub l1_epoch_poll_interval: Duration,
    /// How often the L1 system config is reloaded, `None` disables (default: 10m).
    pub runtime_config_reload_interval: Option<Duration>,
    /// Path of the safe head database, `None` disables it.
    pub safe_db_path: Option<PathBuf>,
    /// Durable sequencer run state.
    pub config_persistence: Arc<dyn ConfigPersistence>,
    /// Halt threshold for protocol version signals.
    pub rollup_halt: HaltSeverity,
    /// Fired to shut the node down.
    pub cancel: Option<CancelHandle>,
    /// High-availability leader coordination.
    pub conductor: ConductorConfig,
    /// Alternative data availability.
    pub alt_da: AltDaConfig,
    /// Data availability committee for L2 blobs.
    pub dac: Option<DacConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            l1: L1EndpointConfig::default(),
            l2: L2EndpointConfig::default(),
            beacon: None,
            supervisor: None,
            rollup: RollupConfig::default(),
            driver: DriverConfig::default(),
            p2p: None,
            rpc: RpcConfig::default(),
            metrics: MetricsConfig::default(),
            pprof: PprofConfig::default(),
            sync: SyncConfig::default(),
            l1_epoch_poll_interval: Duration::from_secs(12),
            runtime_config_reload_interval: Some(Duration::from_secs(600)),
            safe_db_path: None,
            config_persistence: Arc::new(DisabledConfigPersistence),
            rollup_halt: HaltSeverity::None,
            cancel: None,
            conductor: ConductorConfig::default(),
            alt_da: AltDaConfig::default(),
            dac: None,
        }
    }
}

impl Config {
    /// Creates a new builder with every field at its default.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Returns true if networking is configured and not disabled.
    pub fn p2p_enabled(&self) -> bool {
        self.p2p.as_ref().is_some_and(|p2p| !p2p.disabled)
    }

    /// The block signer, when this node sequences with networking enabled.
    pub fn p2p_signer(&self) -> Option<&P2pSignerConfig> {
        if !self.driver.sequencer_enabled {
            return None;
        }
        self.p2p.as_ref().filter(|p2p| !p2p.disabled).and_then(|p2p| p2p.signer.as_ref())
    }

    /// Returns true if this node sequences and the L2 blob feature is scheduled.
    ///
    /// Exactly these nodes must have a committee configured.
    pub fn requires_dac(&self) -> bool {
        self.driver.sequencer_enabled && self.rollup.is_l2_blob_time_set()
    }

    /// Binds a client to the configured committee.
    ///
    /// `Ok(None)` when no committee is configured or its member list is empty. No network
    /// I/O happens here.
    pub fn dac_client(&self) -> Result<Option<Arc<dyn DacClient>>, DacError> {
        let Some(dac) = &self.dac else {
            return Ok(None);
        };
        Ok(dac.client()?.map(|client| Arc::new(client) as Arc<dyn DacClient>))
    }
}

/// Builder for [`Config`].
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Sets the L1 endpoint.
    pub fn l1(mut self, l1: L1EndpointConfig) -> Self {
        self.config.l1 = l1;
        self
    }

    /// Sets the L2 endpoint.
    pub fn l2(mut self, l2: L2EndpointConfig) -> Self {
        self.config.l2 = l2;
        self
    }

    /// Sets the beacon endpoint.
    pub fn beacon(mut self, beacon: L1BeaconEndpointConfig) -> Self {
        self.config.beacon = Some(beacon);
        self
    }

    /// Sets the supervisor endpoint.
    pub fn supervisor(mut self, supervisor: SupervisorEndpointConfig) -> Self {
        self.config.supervisor = Some(supervisor);
        self
    }

    /// Sets the rollup config.
    pub fn rollup(mut self, rollup: RollupConfig) -> Self {
        self.config.rollup = rollup;
        self
    }

    /// Sets the driver config.
    pub fn driver(mut self, driver: DriverConfig) -> Self {
        self.config.driver = driver;
        self
    }

    /// Enables or disables sequencing.
    pub fn sequencer_enabled(mut self, enabled: bool) -> Self {
        self.config.driver.sequencer_enabled = enabled;
        self
    }

    /// Sets whether the sequencer starts stopped.
    pub fn sequencer_stopped(self, stopped: bool) -> Self {
        self.config.driver.sequencer_stopped.set(stopped);
        self
    }

    /// Enables networking.
    pub fn p2p(mut self, p2p: P2pConfig) -> Self {
        self.config.p2p = Some(p2p);
        self
    }

    /// Sets the RPC server config.
    pub fn rpc(mut self, rpc: RpcConfig) -> Self {
        self.config.rpc = rpc;
        self
    }

    /// Sets the metrics config.
    pub fn metrics(mut self, metrics: MetricsConfig) -> Self {
        self.config.metrics = metrics;
        self
    }

    /// Sets the profiling config.
    pub fn pprof(mut self, pprof: PprofConfig) -> Self {
        self.config.pprof = pprof;
        self
    }

    /// Sets the sync config.
    pub const fn sync(mut self, sync: SyncConfig) -> Self {
        self.config.sync = sync;
        self
    }

    /// Sets the L1 epoch poll interval.
    pub const fn l1_epoch_poll_interval(mut self, interval: Duration) -> Self {
        self.config.l1_epoch_poll_interval = interval;
        self
    }

    /// Sets the runtime config reload interval, `None` disables reloading.
    pub const fn runtime_config_reload_interval(mut self, interval: Option<Duration>) -> Self {
        self.config.runtime_config_reload_interval = interval;
        self
    }

    /// Enables the safe head database at `path`.
    pub fn safe_db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.safe_db_path = Some(path.into());
        self
    }

    /// Sets the persisted state store.
    pub fn config_persistence(mut self, persistence: Arc<dyn ConfigPersistence>) -> Self {
        self.config.config_persistence = persistence;
        self
    }

    /// Sets the halt threshold.
    pub const fn rollup_halt(mut self, rollup_halt: HaltSeverity) -> Self {
        self.config.rollup_halt = rollup_halt;
        self
    }

    /// Sets the cancel handle.
    pub fn cancel(mut self, cancel: CancelHandle) -> Self {
        self.config.cancel = Some(cancel);
        self
    }

    /// Sets the conductor config.
    pub fn conductor(mut self, conductor: ConductorConfig) -> Self {
        self.config.conductor = conductor;
        self
    }

    /// Sets the alt-DA config.
    pub fn alt_da(mut self, alt_da: AltDaConfig) -> Self {
        self.config.alt_da = alt_da;
        self
    }

    /// Sets the committee config.
    pub fn dac(mut self, dac: DacConfig) -> Self {
        self.config.dac = Some(dac);
        self
    }

    /// Builds the [`Config`].
    pub fn build(self) -> Config {
        self.config
    }
}
