//! Rollup configuration.

use alloy_primitives::{Address, B256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Hardfork, ScheduleError, UpgradeSchedule};

/// A block anchor used in the genesis definition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisBlock {
    /// Block hash.
    pub hash: B256,
    /// Block number.
    pub number: u64,
}

/// Genesis anchors of the rollup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genesis {
    /// The L1 block the rollup starts deriving from.
    pub l1: GenesisBlock,
    /// The first L2 block.
    pub l2: GenesisBlock,
    /// Timestamp of the first L2 block.
    pub l2_time: u64,
}

/// Rollup chain parameters and upgrade schedule, in the `rollup.json` shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollupConfig {
    /// Genesis anchors.
    pub genesis: Genesis,
    /// Seconds between L2 blocks.
    pub block_time: u64,
    /// Maximum drift of an L2 block timestamp past its L1 origin, in seconds.
    pub max_sequencer_drift: u64,
    /// Sequencing window in L1 blocks.
    pub seq_window_size: u64,
    /// Channel timeout in L1 blocks.
    pub channel_timeout: u64,
    /// L1 chain id.
    pub l1_chain_id: u64,
    /// L2 chain id.
    pub l2_chain_id: u64,
    /// Address batches are sent to on L1.
    pub batch_inbox_address: Address,
    /// L1 deposit contract.
    pub deposit_contract_address: Address,
    /// L1 system config contract.
    pub l1_system_config_address: Address,
    /// Optional L1 protocol versions contract, used for halt signaling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol_versions_address: Option<Address>,
    /// Upgrade activation timestamps.
    #[serde(flatten)]
    pub hardforks: UpgradeSchedule,
}

impl RollupConfig {
    /// Ecotone activation timestamp, if scheduled.
    #[must_use]
    pub const fn ecotone_time(&self) -> Option<u64> {
        self.hardforks.activation_time(Hardfork::Ecotone)
    }

    /// Interop activation timestamp, if scheduled.
    #[must_use]
    pub const fn interop_time(&self) -> Option<u64> {
        self.hardforks.activation_time(Hardfork::Interop)
    }

    /// Returns true if the L2 blob feature is scheduled.
    #[must_use]
    pub const fn is_l2_blob_time_set(&self) -> bool {
        self.hardforks.is_l2_blob_time_set()
    }

    /// Check if a hardfork is active at the given L2 timestamp.
    #[must_use]
    pub const fn is_active(&self, hardfork: Hardfork, timestamp: u64) -> bool {
        self.hardforks.is_active(hardfork, timestamp)
    }

    /// Structural validation of the chain parameters and the upgrade schedule.
    pub fn check(&self) -> Result<(), RollupConfigError> {
        if self.block_time == 0 {
            return Err(RollupConfigError::BlockTimeZero);
        }
        if self.channel_timeout == 0 {
            return Err(RollupConfigError::MissingChannelTimeout);
        }
        if self.seq_window_size < 2 {
            return Err(RollupConfigError::InvalidSeqWindowSize(self.seq_window_size));
        }
        if self.max_sequencer_drift == 0 {
            return Err(RollupConfigError::MissingMaxSequencerDrift);
        }
        if self.genesis.l1.hash.is_zero() {
            return Err(RollupConfigError::MissingGenesisL1Hash);
        }
        if self.genesis.l2.hash.is_zero() {
            return Err(RollupConfigError::MissingGenesisL2Hash);
        }
        if self.genesis.l2_time == 0 {
            return Err(RollupConfigError::GenesisL2TimeZero);
        }
        if self.l1_chain_id == 0 {
            return Err(RollupConfigError::MissingL1ChainId);
        }
        if self.l2_chain_id == 0 {
            return Err(RollupConfigError::MissingL2ChainId);
        }
        if self.l1_chain_id == self.l2_chain_id {
            return Err(RollupConfigError::ChainIdsEqual(self.l1_chain_id));
        }
        if self.batch_inbox_address.is_zero() {
            return Err(RollupConfigError::MissingBatchInboxAddress);
        }
        if self.deposit_contract_address.is_zero() {
            return Err(RollupConfigError::MissingDepositContractAddress);
        }
        self.hardforks.check()?;
        Ok(())
    }
}

/// Rollup configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RollupConfigError {
    /// Block time is zero.
    #[error("block time cannot be 0")]
    BlockTimeZero,

    /// Channel timeout is zero.
    #[error("channel timeout must be set")]
    MissingChannelTimeout,

    /// Sequencing window too small.
    #[error("sequencing window size must be at least 2, got {0}")]
    InvalidSeqWindowSize(u64),

    /// Max sequencer drift is zero.
    #[error("max sequencer drift must be set")]
    MissingMaxSequencerDrift,

    /// Genesis L1 hash is zero.
    #[error("genesis L1 hash cannot be empty")]
    MissingGenesisL1Hash,

    /// Genesis L2 hash is zero.
    #[error("genesis L2 hash cannot be empty")]
    MissingGenesisL2Hash,

    /// Genesis L2 timestamp is zero.
    #[error("genesis L2 time cannot be 0")]
    GenesisL2TimeZero,

    /// L1 chain id is zero.
    #[error("L1 chain id must be set")]
    MissingL1ChainId,

    /// L2 chain id is zero.
    #[error("L2 chain id must be set")]
    MissingL2ChainId,

    /// L1 and L2 share a chain id.
    #[error("L1 and L2 chain ids must be different, both are {0}")]
    ChainIdsEqual(u64),

    /// Batch inbox address is zero.
    #[error("batch inbox address cannot be empty")]
    MissingBatchInboxAddress,

    /// Deposit contract address is zero.
    #[error("deposit contract address cannot be empty")]
    MissingDepositContractAddress,

    /// The upgrade schedule is inconsistent.
    #[error("invalid upgrade schedule: {0}")]
    Schedule(#[from] ScheduleError),
}
