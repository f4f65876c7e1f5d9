//! Sync strategy.

use serde::{Deserialize, Serialize};

/// How the node catches up to the chain tip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncMode {
    /// Derive every block from L1.
    #[default]
    ConsensusLayer,
    /// Let the execution client snap sync, then derive.
    ExecutionLayer,
}

/// Sync settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Sync strategy (default: consensus layer).
    pub sync_mode: SyncMode,
    /// Skip the sanity check of the starting L2 head against L1.
    pub skip_sync_start_check: bool,
    /// The execution client can sync past finalized blocks.
    pub supports_post_finalization_el_sync: bool,
}
