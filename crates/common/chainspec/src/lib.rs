#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/refcell/keel/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod base;
pub use base::{BASE_MAINNET_CONFIG, BASE_MAINNET_SCHEDULE};

mod protocol;
pub use protocol::{ProtocolVersion, ProtocolVersionComparison, ProtocolVersionError};

mod rollup;
pub use rollup::{Genesis, GenesisBlock, RollupConfig, RollupConfigError};

/// Rollup protocol upgrades in chronological order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Hardfork {
    /// Bedrock - active from genesis
    Bedrock,
    /// Regolith hardfork
    Regolith,
    /// Canyon hardfork
    Canyon,
    /// Delta hardfork
    Delta,
    /// Ecotone hardfork, introduces blob-carrying L1 data and the beacon dependency
    Ecotone,
    /// Fjord hardfork
    Fjord,
    /// Granite hardfork
    Granite,
    /// Holocene hardfork
    Holocene,
    /// Isthmus hardfork
    Isthmus,
    /// Jovian hardfork
    Jovian,
    /// Interop hardfork, requires a supervisor endpoint
    Interop,
}

impl Hardfork {
    /// Every hardfork, oldest first.
    pub const ALL: [Self; 11] = [
        Self::Bedrock,
        Self::Regolith,
        Self::Canyon,
        Self::Delta,
        Self::Ecotone,
        Self::Fjord,
        Self::Granite,
        Self::Holocene,
        Self::Isthmus,
        Self::Jovian,
        Self::Interop,
    ];

    /// Optional forks may be scheduled without their predecessors.
    #[must_use]
    pub const fn is_optional(self) -> bool {
        matches!(self, Self::Interop)
    }

    /// Human readable name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bedrock => "Bedrock",
            Self::Regolith => "Regolith",
            Self::Canyon => "Canyon",
            Self::Delta => "Delta",
            Self::Ecotone => "Ecotone",
            Self::Fjord => "Fjord",
            Self::Granite => "Granite",
            Self::Holocene => "Holocene",
            Self::Isthmus => "Isthmus",
            Self::Jovian => "Jovian",
            Self::Interop => "Interop",
        }
    }
}

impl fmt::Display for Hardfork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Upgrade activation timestamps.
///
/// `None` means the upgrade is not scheduled. Once a timestamp is observed as scheduled
/// it is treated as fixed for the life of the process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpgradeSchedule {
    /// Regolith activation timestamp
    #[serde(rename = "regolith_time", skip_serializing_if = "Option::is_none")]
    pub regolith: Option<u64>,
    /// Canyon activation timestamp
    #[serde(rename = "canyon_time", skip_serializing_if = "Option::is_none")]
    pub canyon: Option<u64>,
    /// Delta activation timestamp
    #[serde(rename = "delta_time", skip_serializing_if = "Option::is_none")]
    pub delta: Option<u64>,
    /// Ecotone activation timestamp
    #[serde(rename = "ecotone_time", skip_serializing_if = "Option::is_none")]
    pub ecotone: Option<u64>,
    /// Fjord activation timestamp
    #[serde(rename = "fjord_time", skip_serializing_if = "Option::is_none")]
    pub fjord: Option<u64>,
    /// Granite activation timestamp
    #[serde(rename = "granite_time", skip_serializing_if = "Option::is_none")]
    pub granite: Option<u64>,
    /// Holocene activation timestamp
    #[serde(rename = "holocene_time", skip_serializing_if = "Option::is_none")]
    pub holocene: Option<u64>,
    /// Isthmus activation timestamp
    #[serde(rename = "isthmus_time", skip_serializing_if = "Option::is_none")]
    pub isthmus: Option<u64>,
    /// Jovian activation timestamp
    #[serde(rename = "jovian_time", skip_serializing_if = "Option::is_none")]
    pub jovian: Option<u64>,
    /// Interop activation timestamp
    #[serde(rename = "interop_time", skip_serializing_if = "Option::is_none")]
    pub interop: Option<u64>,
    /// Activation timestamp of L2 blob transactions posted through the data availability
    /// committee. Independent of the ordered hardfork chain.
    #[serde(rename = "l2_blob_time", skip_serializing_if = "Option::is_none")]
    pub l2_blob: Option<u64>,
}

impl UpgradeSchedule {
    /// Get the activation timestamp for a hardfork, `None` if unscheduled
    #[must_use]
    pub const fn activation_time(&self, hardfork: Hardfork) -> Option<u64> {
        match hardfork {
            Hardfork::Bedrock => Some(0),
            Hardfork::Regolith => self.regolith,
            Hardfork::Canyon => self.canyon,
            Hardfork::Delta => self.delta,
            Hardfork::Ecotone => self.ecotone,
            Hardfork::Fjord => self.fjord,
            Hardfork::Granite => self.granite,
            Hardfork::Holocene => self.holocene,
            Hardfork::Isthmus => self.isthmus,
            Hardfork::Jovian => self.jovian,
            Hardfork::Interop => self.interop,
        }
    }

    /// Check if a hardfork has an activation timestamp
    #[must_use]
    pub const fn is_scheduled(&self, hardfork: Hardfork) -> bool {
        self.activation_time(hardfork).is_some()
    }

    /// Check if a hardfork is active at the given timestamp
    #[must_use]
    pub const fn is_active(&self, hardfork: Hardfork, timestamp: u64) -> bool {
        match self.activation_time(hardfork) {
            Some(time) => timestamp >= time,
            None => false,
        }
    }

    /// Returns true if the L2 blob feature has an activation timestamp
    #[must_use]
    pub const fn is_l2_blob_time_set(&self) -> bool {
        self.l2_blob.is_some()
    }

    /// Check if L2 blobs are active at the given timestamp
    #[must_use]
    pub const fn is_l2_blob_active(&self, timestamp: u64) -> bool {
        match self.l2_blob {
            Some(time) => timestamp >= time,
            None => false,
        }
    }

    /// Get the highest active hardfork at the given timestamp
    #[must_use]
    pub fn active_hardfork(&self, timestamp: u64) -> Hardfork {
        Hardfork::ALL
            .into_iter()
            .rev()
            .find(|fork| self.is_active(*fork, timestamp))
            .unwrap_or(Hardfork::Bedrock)
    }

    /// Verifies that scheduled upgrades form a consistent chain.
    ///
    /// A required fork cannot be scheduled while an earlier required fork is unset, and
    /// no scheduled fork may activate before an earlier scheduled one.
    pub fn check(&self) -> Result<(), ScheduleError> {
        let mut unset: Option<Hardfork> = None;
        let mut latest: Option<(Hardfork, u64)> = None;

        for fork in Hardfork::ALL {
            let Some(time) = self.activation_time(fork) else {
                if !fork.is_optional() && unset.is_none() {
                    unset = Some(fork);
                }
                continue;
            };

            if let Some(missing) = unset {
                if !fork.is_optional() {
                    return Err(ScheduleError::MissingPredecessor { fork, time, missing });
                }
            }
            if let Some((previous, previous_time)) = latest {
                if time < previous_time {
                    return Err(ScheduleError::OutOfOrder { fork, time, previous, previous_time });
                }
            }
            latest = Some((fork, time));
        }

        Ok(())
    }
}

/// Upgrade schedule inconsistencies.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// A fork is scheduled while an earlier fork is not.
    #[error("{fork} is scheduled (timestamp = {time}) but the earlier {missing} upgrade is not")]
    MissingPredecessor {
        /// The scheduled fork.
        fork: Hardfork,
        /// Its activation timestamp.
        time: u64,
        /// The earliest unscheduled predecessor.
        missing: Hardfork,
    },

    /// A fork activates before its predecessor.
    #[error("{fork} (timestamp = {time}) activates before {previous} (timestamp = {previous_time})")]
    OutOfOrder {
        /// The misordered fork.
        fork: Hardfork,
        /// Its activation timestamp.
        time: u64,
        /// The preceding scheduled fork.
        previous: Hardfork,
        /// The preceding fork's activation timestamp.
        previous_time: u64,
    },
}
