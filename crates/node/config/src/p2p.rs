//! Peer-to-peer networking configuration.

use std::{
    fmt,
    net::{IpAddr, Ipv4Addr},
    time::Duration,
};

use alloy_primitives::{Address, B256};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Key that signs unsafe blocks a sequencer gossips.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum P2pSignerConfig {
    /// A secp256k1 private key held by the node.
    LocalKey(B256),
    /// A remote signing service.
    Remote {
        /// Signer RPC URL.
        endpoint: String,
        /// Address the signer signs for.
        address: Address,
    },
}

impl fmt::Debug for P2pSignerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LocalKey(_) => f.debug_tuple("LocalKey").field(&"<redacted>").finish(),
            Self::Remote { endpoint, address } => f
                .debug_struct("Remote")
                .field("endpoint", endpoint)
                .field("address", address)
                .finish(),
        }
    }
}

impl P2pSignerConfig {
    /// Validates the key or the remote signer address.
    pub fn check(&self) -> Result<(), P2pConfigError> {
        match self {
            Self::LocalKey(key) if key.is_zero() => Err(P2pConfigError::EmptySignerKey),
            Self::LocalKey(_) => Ok(()),
            Self::Remote { endpoint, address } => {
                let parsed = Url::parse(endpoint)
                    .map_err(|_| P2pConfigError::InvalidSignerEndpoint(endpoint.clone()))?;
                if !matches!(parsed.scheme(), "http" | "https") {
                    return Err(P2pConfigError::InvalidSignerEndpoint(endpoint.clone()));
                }
                if address.is_zero() {
                    return Err(P2pConfigError::EmptySignerAddress);
                }
                Ok(())
            }
        }
    }
}

/// Gossip and discovery settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct P2pConfig {
    /// Disable networking while keeping the rest of the config.
    pub disabled: bool,
    /// Listen address (default: 0.0.0.0).
    pub listen_ip: IpAddr,
    /// Libp2p TCP port (default: 9222).
    pub listen_tcp_port: u16,
    /// Discovery UDP port (default: 9222).
    pub listen_udp_port: u16,
    /// Low-water mark of connected peers (default: 20).
    pub peers_lo: u32,
    /// High-water mark of connected peers (default: 30).
    pub peers_hi: u32,
    /// Grace period before new peers may be pruned (default: 30s).
    pub peers_grace: Duration,
    /// Multiaddrs of peers to keep connected.
    pub static_peers: Vec<String>,
    /// ENRs used to bootstrap discovery.
    pub bootnodes: Vec<String>,
    /// Disable discv5.
    pub no_discovery: bool,
    /// Block signer, used only while sequencing.
    pub signer: Option<P2pSignerConfig>,
}

impl Default for P2pConfig {
    fn default() -> Self {
        Self {
            disabled: false,
            listen_ip: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            listen_tcp_port: 9222,
            listen_udp_port: 9222,
            peers_lo: 20,
            peers_hi: 30,
            peers_grace: Duration::from_secs(30),
            static_peers: Vec::new(),
            bootnodes: Vec::new(),
            no_discovery: false,
            signer: None,
        }
    }
}

impl P2pConfig {
    /// Validates peer limits and address lists.
    pub fn check(&self) -> Result<(), P2pConfigError> {
        if self.peers_hi == 0 {
            return Err(P2pConfigError::ZeroPeersHi);
        }
        if self.peers_lo > self.peers_hi {
            return Err(P2pConfigError::PeerBounds { lo: self.peers_lo, hi: self.peers_hi });
        }
        if let Some(idx) = self.static_peers.iter().position(|p| p.trim().is_empty()) {
            return Err(P2pConfigError::EmptyStaticPeer(idx));
        }
        if let Some(idx) = self.bootnodes.iter().position(|b| b.trim().is_empty()) {
            return Err(P2pConfigError::EmptyBootnode(idx));
        }
        if let Some(signer) = &self.signer {
            signer.check()?;
        }
        Ok(())
    }
}

/// P2P configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum P2pConfigError {
    /// The peer high-water mark is zero.
    #[error("peers_hi must be greater than zero")]
    ZeroPeersHi,

    /// Peer low-water mark above the high-water mark.
    #[error("peers_lo ({lo}) must not exceed peers_hi ({hi})")]
    PeerBounds {
        /// Low-water mark.
        lo: u32,
        /// High-water mark.
        hi: u32,
    },

    /// Blank static peer entry.
    #[error("static peer {0} is empty")]
    EmptyStaticPeer(usize),

    /// Blank bootnode entry.
    #[error("bootnode {0} is empty")]
    EmptyBootnode(usize),

    /// The local signer key is all zeroes.
    #[error("p2p signer private key is empty")]
    EmptySignerKey,

    /// The remote signer URL does not parse or is not http(s).
    #[error("invalid p2p remote signer endpoint: {0:?}")]
    InvalidSignerEndpoint(String),

    /// The remote signer address is zero.
    #[error("p2p remote signer address cannot be empty")]
    EmptySignerAddress,
}
