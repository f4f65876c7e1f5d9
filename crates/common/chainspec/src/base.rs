//! Base Mainnet presets

use alloy_primitives::{address, b256};

use crate::{Genesis, GenesisBlock, RollupConfig, UpgradeSchedule};

/// Base Mainnet rollup configuration
pub const BASE_MAINNET_CONFIG: RollupConfig = RollupConfig {
    genesis: Genesis {
        l1: GenesisBlock {
            hash: b256!("0x5c13d307623a926cd31415036c8b7fa14572f9dac64528e857a470511fc30771"),
            number: 17_481_768,
        },
        l2: GenesisBlock {
            hash: b256!("0xf712aa9241cc24369b143cf6dce85f0902a9731e70d66818a3a5845b296c73dd"),
            number: 0,
        },
        l2_time: 1_686_789_347,
    },
    block_time: 2,
    max_sequencer_drift: 600,
    seq_window_size: 3600,
    channel_timeout: 300,
    l1_chain_id: 1,
    l2_chain_id: 8453,
    batch_inbox_address: address!("0xff00000000000000000000000000000000008453"),
    deposit_contract_address: address!("0x49048044d57e1c92a77f79988d21fa8faf74e97e"),
    l1_system_config_address: address!("0x73a79fab69143498ed3712e519a88a918e1f4072"),
    protocol_versions_address: Some(address!("0x8062abc286f5e7d9428a0ccb9abd71e50d93b935")),
    hardforks: BASE_MAINNET_SCHEDULE,
};

/// Base Mainnet upgrade activation timestamps
pub const BASE_MAINNET_SCHEDULE: UpgradeSchedule = UpgradeSchedule {
    // Regolith active from genesis
    regolith: Some(0),
    // Canyon activation: January 11, 2024 at 17:00:01 UTC
    canyon: Some(1_704_992_401),
    // Delta activation: February 22, 2024 at 00:00:00 UTC
    delta: Some(1_708_560_000),
    // Ecotone activation: March 14, 2024 at 00:00:01 UTC
    ecotone: Some(1_710_374_401),
    // Fjord activation: July 10, 2024 at 16:00:01 UTC
    fjord: Some(1_720_627_201),
    // Granite activation: September 11, 2024 at 16:00:01 UTC
    granite: Some(1_726_070_401),
    // Holocene activation: January 9, 2025 at 18:00:01 UTC
    holocene: Some(1_736_445_601),
    // Isthmus activation: May 9, 2025 at 16:00:01 UTC
    isthmus: Some(1_746_806_401),
    // Jovian activation: December 2, 2025 at 16:00:01 UTC
    jovian: Some(1_764_777_601),
    interop: None,
    l2_blob: None,
};
