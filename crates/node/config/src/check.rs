//! Startup reconciliation and the invariant gate.

use keel_persistence::{PersistenceError, SequencerState};
use tracing::{info, warn};

use crate::{Config, ConfigError, EndpointSetup};

impl Config {
    /// Lets a durable sequencer run state override the supplied `sequencer_stopped` value.
    ///
    /// Does nothing for non-sequencers. Safe to call repeatedly.
    pub fn load_persisted(&self) -> Result<(), PersistenceError> {
        if !self.driver.sequencer_enabled {
            return Ok(());
        }

        let state = self.config_persistence.sequencer_state()?;
        if !state.is_set() {
            info!("No persisted sequencer state loaded");
            return Ok(());
        }

        let stopped = state == SequencerState::Stopped;
        let supplied = self.driver.sequencer_stopped.set(stopped);
        if supplied != stopped {
            warn!(stopped, supplied, "Overriding sequencer.stopped with persisted state");
        }
        Ok(())
    }

    /// Checks every cross-subsystem invariant and returns the first violation.
    ///
    /// Runs after [`Config::load_persisted`]. Invariants are checked in a fixed order:
    /// endpoints, upgrade-gated endpoints, rollup, listeners, p2p, conductor, alt-DA and
    /// finally the committee.
    pub fn check(&self) -> Result<(), ConfigError> {
        self.l1.check().map_err(ConfigError::L1Endpoint)?;
        self.l2.check().map_err(ConfigError::L2Endpoint)?;

        if let Some(ecotone_time) = self.rollup.ecotone_time() {
            let beacon = self
                .beacon
                .as_ref()
                .ok_or(ConfigError::MissingBeaconEndpoint { ecotone_time })?;
            beacon.check().map_err(ConfigError::BeaconEndpoint)?;
        }

        if let Some(interop_time) = self.rollup.interop_time() {
            let supervisor = self
                .supervisor
                .as_ref()
                .ok_or(ConfigError::MissingSupervisorEndpoint { interop_time })?;
            supervisor.check().map_err(ConfigError::SupervisorEndpoint)?;
        }

        self.rollup.check()?;
        self.metrics.check()?;
        self.pprof.check()?;

        if let Some(p2p) = self.p2p.as_ref().filter(|p2p| !p2p.disabled) {
            p2p.check()?;
        }

        // Halt threshold names are rejected when `HaltSeverity` is parsed.

        self.check_conductor()?;

        self.alt_da.check()?;
        if self.alt_da.enabled {
            warn!("Alt-DA mode is a beta feature, use at your own risk");
        }

        self.check_dac()
    }

    fn check_conductor(&self) -> Result<(), ConfigError> {
        if !self.conductor.enabled {
            return Ok(());
        }
        if self.config_persistence.sequencer_state()?.is_set() {
            return Err(ConfigError::ConductorWithPersistence);
        }
        if !self.driver.sequencer_enabled {
            return Err(ConfigError::ConductorRequiresSequencer);
        }
        if self.conductor.rpc.is_none() {
            return Err(ConfigError::ConductorRpcMissing);
        }
        Ok(())
    }

    fn check_dac(&self) -> Result<(), ConfigError> {
        match (&self.dac, self.requires_dac()) {
            (None, true) => Err(ConfigError::DacUrlsRequired),
            (Some(_), false) => Err(ConfigError::DacUrlsNotAllowed),
            (Some(dac), true) => {
                dac.check()?;
                info!(
                    members = dac.urls.len(),
                    l2_blob_time = ?self.rollup.hardforks.l2_blob,
                    "DAC committee configured"
                );
                Ok(())
            }
            (None, false) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use alloy_primitives::{B256, b256};
    use keel_chainspec::{BASE_MAINNET_CONFIG, RollupConfig, RollupConfigError};
    use keel_dac::{DacConfig, DacConfigError};
    use keel_persistence::ConfigPersistence;
    use rstest::rstest;
    use tracing_test::traced_test;

    use super::*;
    use crate::{
        AltDaConfig, ConductorConfig, EndpointError, L1BeaconEndpointConfig, L1EndpointConfig,
        L2EndpointConfig, MetricsConfig, MetricsConfigError, P2pConfig, P2pConfigError,
        P2pSignerConfig, PprofConfig, PprofConfigError, ProfileType, StaticConductorRpc,
        SupervisorEndpointConfig,
    };

    /// A store that always reports the same state.
    #[derive(Debug)]
    struct FixedPersistence(SequencerState);

    impl ConfigPersistence for FixedPersistence {
        fn sequencer_started(&self) -> Result<(), PersistenceError> {
            Ok(())
        }

        fn sequencer_stopped(&self) -> Result<(), PersistenceError> {
            Ok(())
        }

        fn sequencer_state(&self) -> Result<SequencerState, PersistenceError> {
            Ok(self.0)
        }
    }

    /// A store whose reads always fail.
    #[derive(Debug)]
    struct FailingPersistence;

    impl ConfigPersistence for FailingPersistence {
        fn sequencer_started(&self) -> Result<(), PersistenceError> {
            Ok(())
        }

        fn sequencer_stopped(&self) -> Result<(), PersistenceError> {
            Ok(())
        }

        fn sequencer_state(&self) -> Result<SequencerState, PersistenceError> {
            Err(PersistenceError::Io(std::io::Error::other("disk on fire")))
        }
    }

    fn rollup_with_l2_blob(l2_blob: Option<u64>) -> RollupConfig {
        let mut rollup = BASE_MAINNET_CONFIG;
        rollup.hardforks.l2_blob = l2_blob;
        rollup
    }

    /// A verifier config that passes every check.
    fn valid() -> Config {
        Config::builder()
            .l1(L1EndpointConfig::new("http://l1:8545"))
            .l2(L2EndpointConfig::new(
                "http://l2:8551",
                b256!("0x688f5d737bad920bdfb2fc2f488d6b6209eebda1dae949a8de91398d932c517a"),
            ))
            .beacon(L1BeaconEndpointConfig::new("http://beacon:5052"))
            .rollup(BASE_MAINNET_CONFIG)
            .build()
    }

    fn persisted(state: SequencerState) -> Arc<dyn ConfigPersistence> {
        Arc::new(FixedPersistence(state))
    }

    #[test]
    fn valid_config_passes() {
        assert!(valid().check().is_ok());
    }

    #[test]
    fn primary_endpoint_fails_before_metrics() {
        let mut config = valid();
        config.l1.url = String::new();
        config.metrics = MetricsConfig::enabled(-1);

        let err = config.check().unwrap_err();
        assert!(matches!(err, ConfigError::L1Endpoint(EndpointError::Empty(_))));
        assert_eq!(err.subsystem(), "l1");

        config.l1 = L1EndpointConfig::new("http://l1:8545");
        let err = config.check().unwrap_err();
        assert!(matches!(err, ConfigError::Metrics(MetricsConfigError::InvalidPort(-1))));
        assert_eq!(err.subsystem(), "metrics");
    }

    #[test]
    fn secondary_endpoint_is_checked() {
        let mut config = valid();
        config.l2.jwt_secret = Default::default();
        assert!(matches!(
            config.check(),
            Err(ConfigError::L2Endpoint(EndpointError::EmptyJwtSecret))
        ));
    }

    #[rstest]
    #[case(true, false, false)]
    #[case(true, true, true)]
    #[case(false, false, true)]
    #[case(false, true, true)]
    fn beacon_required_iff_ecotone(
        #[case] ecotone: bool,
        #[case] beacon: bool,
        #[case] ok: bool,
    ) {
        let mut config = valid();
        if !ecotone {
            let forks = &mut config.rollup.hardforks;
            forks.ecotone = None;
            forks.fjord = None;
            forks.granite = None;
            forks.holocene = None;
            forks.isthmus = None;
            forks.jovian = None;
        }
        config.beacon = beacon.then(|| L1BeaconEndpointConfig::new("http://beacon:5052"));

        let result = config.check();
        assert_eq!(result.is_ok(), ok, "{result:?}");
        if ecotone && !beacon {
            assert!(matches!(result, Err(ConfigError::MissingBeaconEndpoint { .. })));
        }
    }

    #[test]
    fn missing_beacon_message_names_timestamp() {
        let mut config = valid();
        config.beacon = None;
        let err = config.check().unwrap_err();
        let ecotone = BASE_MAINNET_CONFIG.ecotone_time().unwrap();
        assert_eq!(
            err.to_string(),
            format!(
                "the Ecotone upgrade is scheduled (timestamp = {ecotone}) but no L1 Beacon API endpoint is configured"
            )
        );
        assert_eq!(err.subsystem(), "l1.beacon");
    }

    #[test]
    fn misconfigured_beacon() {
        let mut config = valid();
        config.beacon = Some(L1BeaconEndpointConfig::new(""));
        let err = config.check().unwrap_err();
        assert!(matches!(err, ConfigError::BeaconEndpoint(EndpointError::Empty(_))));
        assert_eq!(err.subsystem(), "l1.beacon");
    }

    #[test]
    fn supervisor_required_iff_interop() {
        let mut config = valid();
        config.rollup.hardforks.interop = Some(1_800_000_000);
        assert!(matches!(
            config.check(),
            Err(ConfigError::MissingSupervisorEndpoint { interop_time: 1_800_000_000 })
        ));

        config.supervisor = Some(SupervisorEndpointConfig::new("ws://supervisor:8545"));
        assert!(config.check().is_ok());

        config.rollup.hardforks.interop = None;
        assert!(config.check().is_ok());
    }

    #[test]
    fn misconfigured_supervisor() {
        let mut config = valid();
        config.rollup.hardforks.interop = Some(1_800_000_000);
        config.supervisor = Some(SupervisorEndpointConfig::new(""));
        let err = config.check().unwrap_err();
        assert!(matches!(err, ConfigError::SupervisorEndpoint(EndpointError::Empty(_))));
        assert_eq!(err.subsystem(), "supervisor");
    }

    #[test]
    fn rollup_errors_are_wrapped() {
        let mut config = valid();
        config.rollup.block_time = 0;
        let err = config.check().unwrap_err();
        assert!(matches!(err, ConfigError::Rollup(RollupConfigError::BlockTimeZero)));
        assert_eq!(err.subsystem(), "rollup");
    }

    #[rstest]
    #[case(0, true)]
    #[case(65535, true)]
    #[case(65536, false)]
    #[case(-1, false)]
    fn metrics_port_boundaries(#[case] port: i32, #[case] ok: bool) {
        let mut config = valid();
        config.metrics = MetricsConfig::enabled(port);
        assert_eq!(config.check().is_ok(), ok);

        config.metrics.enabled = false;
        assert!(config.check().is_ok());
    }

    #[test]
    fn pprof_errors_are_wrapped() {
        let mut config = valid();
        config.pprof = PprofConfig { profile_type: Some(ProfileType::Cpu), ..Default::default() };
        let err = config.check().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Pprof(PprofConfigError::MissingProfileDir(ProfileType::Cpu))
        ));
        assert_eq!(err.subsystem(), "pprof");

        config.pprof.profile_dir = Some("/tmp/keel".into());
        assert!(config.check().is_ok());
    }

    #[test]
    fn p2p_checked_only_when_enabled() {
        let broken = P2pConfig { peers_hi: 0, peers_lo: 0, ..Default::default() };

        let mut config = valid();
        config.p2p = Some(P2pConfig { disabled: true, ..broken.clone() });
        assert!(config.check().is_ok());

        config.p2p = Some(broken);
        assert!(matches!(config.check(), Err(ConfigError::P2p(P2pConfigError::ZeroPeersHi))));
    }

    #[test]
    fn p2p_signer_is_checked() {
        let mut config = valid();
        let signer = P2pSignerConfig::LocalKey(B256::ZERO);
        config.p2p = Some(P2pConfig { signer: Some(signer), ..Default::default() });
        let err = config.check().unwrap_err();
        assert!(matches!(err, ConfigError::P2p(P2pConfigError::EmptySignerKey)));
        assert_eq!(err.subsystem(), "p2p");
    }

    fn conductor() -> ConductorConfig {
        ConductorConfig::enabled(Arc::new(StaticConductorRpc::new("http://conductor:8547")))
    }

    #[rstest]
    #[case(SequencerState::Started)]
    #[case(SequencerState::Stopped)]
    fn conductor_rejects_persisted_state(#[case] state: SequencerState) {
        let mut config = valid();
        config.driver.sequencer_enabled = true;
        config.conductor = conductor();
        config.config_persistence = persisted(state);

        let err = config.check().unwrap_err();
        assert!(matches!(err, ConfigError::ConductorWithPersistence));
        assert_eq!(err.subsystem(), "conductor");
    }

    #[test]
    fn conductor_requires_sequencer() {
        let mut config = valid();
        config.conductor = conductor();
        assert!(matches!(config.check(), Err(ConfigError::ConductorRequiresSequencer)));

        config.driver.sequencer_enabled = true;
        assert!(config.check().is_ok());
    }

    #[test]
    fn conductor_requires_resolver() {
        let mut config = valid();
        config.driver.sequencer_enabled = true;
        config.conductor = ConductorConfig { enabled: true, ..Default::default() };
        assert!(matches!(config.check(), Err(ConfigError::ConductorRpcMissing)));
    }

    #[test]
    fn conductor_surfaces_store_errors() {
        let mut config = valid();
        config.driver.sequencer_enabled = true;
        config.conductor = conductor();
        config.config_persistence = Arc::new(FailingPersistence);
        let err = config.check().unwrap_err();
        assert!(matches!(err, ConfigError::Persistence(PersistenceError::Io(_))));
    }

    #[test]
    fn persisted_state_ignored_without_conductor() {
        let mut config = valid();
        config.config_persistence = persisted(SequencerState::Started);
        assert!(config.check().is_ok());
    }

    #[test]
    #[traced_test]
    fn alt_da_checked_and_warned() {
        let mut config = valid();
        config.alt_da = AltDaConfig { enabled: true, ..Default::default() };
        assert!(matches!(config.check(), Err(ConfigError::AltDa(_))));

        config.alt_da = AltDaConfig::enabled("http://da:3100");
        assert!(config.check().is_ok());
        assert!(logs_contain("beta feature"));
    }

    #[test]
    #[traced_test]
    fn disabled_alt_da_does_not_warn() {
        let mut config = valid();
        config.alt_da = AltDaConfig { enabled: false, ..AltDaConfig::enabled("ftp://da:3100") };
        assert!(config.check().is_ok());
        assert!(!logs_contain("beta feature"));
    }

    #[rstest]
    #[case(true, true, true, true, "blob sequencer with committee")]
    #[case(true, true, false, false, "blob sequencer without committee")]
    #[case(true, false, true, false, "non-blob sequencer with committee")]
    #[case(false, true, true, false, "blob verifier with committee")]
    #[case(false, false, true, false, "non-blob verifier with committee")]
    #[case(false, false, false, true, "non-blob verifier without committee")]
    #[case(true, false, false, true, "non-blob sequencer without committee")]
    #[case(false, true, false, true, "blob verifier without committee")]
    fn dac_truth_table(
        #[case] sequencer: bool,
        #[case] l2_blob: bool,
        #[case] dac: bool,
        #[case] ok: bool,
        #[case] _description: &str,
    ) {
        let mut config = valid();
        config.driver.sequencer_enabled = sequencer;
        config.rollup = rollup_with_l2_blob(l2_blob.then_some(1_800_000_000));
        config.dac = dac.then(|| DacConfig::new(["http://dac-0:8888"]));

        let result = config.check();
        assert_eq!(result.is_ok(), ok, "{result:?}");
        match (sequencer && l2_blob, dac) {
            (true, false) => assert!(matches!(result, Err(ConfigError::DacUrlsRequired))),
            (false, true) => assert!(matches!(result, Err(ConfigError::DacUrlsNotAllowed))),
            _ => {}
        }
    }

    #[test]
    fn dac_messages() {
        assert_eq!(
            ConfigError::DacUrlsRequired.to_string(),
            "dac.urls must be set for sequencer when l2 blob time is set"
        );
        assert_eq!(
            ConfigError::DacUrlsNotAllowed.to_string(),
            "dac.urls can only be set for sequencer when l2 blob time is set"
        );
        assert_eq!(ConfigError::DacUrlsRequired.subsystem(), "dac");
    }

    #[test]
    fn dac_members_are_checked() {
        let mut config = valid();
        config.driver.sequencer_enabled = true;
        config.rollup = rollup_with_l2_blob(Some(0));

        config.dac = Some(DacConfig::default());
        assert!(matches!(config.check(), Err(ConfigError::Dac(DacConfigError::EmptyUrls))));

        config.dac = Some(DacConfig::new(["ftp://dac-0"]));
        assert!(matches!(
            config.check(),
            Err(ConfigError::Dac(DacConfigError::UnsupportedScheme { .. }))
        ));
    }

    #[rstest]
    #[case(SequencerState::Unset, false, false)]
    #[case(SequencerState::Unset, true, true)]
    #[case(SequencerState::Started, true, false)]
    #[case(SequencerState::Stopped, false, true)]
    fn load_persisted_overrides_flag(
        #[case] state: SequencerState,
        #[case] supplied: bool,
        #[case] expected: bool,
    ) {
        let config = Config::builder()
            .sequencer_enabled(true)
            .sequencer_stopped(supplied)
            .config_persistence(persisted(state))
            .build();

        config.load_persisted().unwrap();
        assert_eq!(config.driver.sequencer_stopped.get(), expected);

        config.load_persisted().unwrap();
        assert_eq!(config.driver.sequencer_stopped.get(), expected);
    }

    #[test]
    fn load_persisted_skips_verifiers() {
        let config = Config::builder()
            .sequencer_stopped(false)
            .config_persistence(Arc::new(FailingPersistence))
            .build();
        config.load_persisted().unwrap();
        assert!(!config.driver.sequencer_stopped.get());
    }

    #[test]
    fn load_persisted_propagates_store_errors() {
        let config = Config::builder()
            .sequencer_enabled(true)
            .config_persistence(Arc::new(FailingPersistence))
            .build();
        assert!(matches!(config.load_persisted(), Err(PersistenceError::Io(_))));
    }

    #[test]
    #[traced_test]
    fn load_persisted_logs() {
        let config = Config::builder().sequencer_enabled(true).build();
        config.load_persisted().unwrap();
        assert!(logs_contain("No persisted sequencer state loaded"));

        let config = Config::builder()
            .sequencer_enabled(true)
            .sequencer_stopped(false)
            .config_persistence(persisted(SequencerState::Stopped))
            .build();
        config.load_persisted().unwrap();
        assert!(logs_contain("Overriding sequencer.stopped with persisted state"));
    }
}
