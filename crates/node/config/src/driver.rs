//! Sequencing driver configuration.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Whether the sequencer is stopped, shared between every clone of the driver config.
///
/// Serializes as a plain boolean.
#[derive(Debug, Clone, Default)]
pub struct SequencerStoppedFlag(Arc<AtomicBool>);

impl SequencerStoppedFlag {
    /// Creates a flag with the given initial value.
    pub fn new(stopped: bool) -> Self {
        Self(Arc::new(AtomicBool::new(stopped)))
    }

    /// Current value.
    pub fn get(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Stores `stopped` and returns the previous value.
    pub fn set(&self, stopped: bool) -> bool {
        self.0.swap(stopped, Ordering::SeqCst)
    }
}

impl PartialEq for SequencerStoppedFlag {
    fn eq(&self, other: &Self) -> bool {
        self.get() == other.get()
    }
}

impl Eq for SequencerStoppedFlag {}

impl Serialize for SequencerStoppedFlag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(self.get())
    }
}

impl<'de> Deserialize<'de> for SequencerStoppedFlag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        bool::deserialize(deserializer).map(Self::new)
    }
}

/// Derivation and sequencing driver settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// L1 confirmations a verifier waits for (default: 0).
    pub verifier_conf_depth: u64,
    /// L1 confirmations the sequencer keeps behind the head (default: 4).
    pub sequencer_conf_depth: u64,
    /// Run as a sequencer.
    pub sequencer_enabled: bool,
    /// Start with sequencing stopped, until told otherwise.
    pub sequencer_stopped: SequencerStoppedFlag,
    /// Max unsafe-to-safe lag before the sequencer pauses, 0 disables (default: 0).
    pub sequencer_max_safe_lag: u64,
    /// Force-close the current channel on startup and recover from the safe head.
    pub recover_mode: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            verifier_conf_depth: 0,
            sequencer_conf_depth: 4,
            sequencer_enabled: false,
            sequencer_stopped: SequencerStoppedFlag::default(),
            sequencer_max_safe_lag: 0,
            recover_mode: false,
        }
    }
}

impl DriverConfig {
    /// Returns a sequencer config, initially stopped or not.
    pub fn sequencer(stopped: bool) -> Self {
        Self {
            sequencer_enabled: true,
            sequencer_stopped: SequencerStoppedFlag::new(stopped),
            ..Default::default()
        }
    }
}
