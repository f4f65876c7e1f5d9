//! Superchain protocol versions.
//!
//! The L1 protocol versions contract signals a required and a recommended version as
//! 32-byte words. Version type 0 lays the word out as
//! `[type | 7 reserved | 8 build | 4 major | 4 minor | 4 patch | 4 pre-release]`.

use std::fmt;

use alloy_primitives::B256;
use thiserror::Error;

/// A decoded version-type-0 protocol version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ProtocolVersion {
    /// Opaque build identifier. Versions with different builds are not comparable.
    pub build: [u8; 8],
    /// Major version.
    pub major: u32,
    /// Minor version.
    pub minor: u32,
    /// Patch version.
    pub patch: u32,
    /// Pre-release number, 0 for a full release.
    pub pre_release: u32,
}

/// Outcome of comparing a local protocol version against another one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtocolVersionComparison {
    /// Both versions are identical.
    Equal,
    /// Local major version is newer.
    AheadMajor,
    /// Local major version is older.
    OutdatedMajor,
    /// Local minor version is newer.
    AheadMinor,
    /// Local minor version is older.
    OutdatedMinor,
    /// Local patch version is newer.
    AheadPatch,
    /// Local patch version is older.
    OutdatedPatch,
    /// Local pre-release is newer.
    AheadPrerelease,
    /// Local pre-release is older.
    OutdatedPrerelease,
    /// Builds differ, the versions cannot be ordered.
    DiffBuild,
    /// At least one side is the zero version, meaning no signal.
    EmptyVersion,
}

impl ProtocolVersion {
    /// Creates a full release version with an empty build.
    #[must_use]
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self { build: [0; 8], major, minor, patch, pre_release: 0 }
    }

    /// Sets the pre-release number.
    #[must_use]
    pub const fn with_pre_release(mut self, pre_release: u32) -> Self {
        self.pre_release = pre_release;
        self
    }

    /// Returns true for the all-zero version.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Decodes an on-chain protocol version word.
    pub fn from_b256(word: B256) -> Result<Self, ProtocolVersionError> {
        let bytes = word.as_slice();
        if bytes[0] != 0 {
            return Err(ProtocolVersionError::UnsupportedVersionType(bytes[0]));
        }
        if bytes[1..8].iter().any(|b| *b != 0) {
            return Err(ProtocolVersionError::ReservedBytesSet);
        }

        let mut build = [0u8; 8];
        build.copy_from_slice(&bytes[8..16]);
        Ok(Self {
            build,
            major: read_u32(&bytes[16..20]),
            minor: read_u32(&bytes[20..24]),
            patch: read_u32(&bytes[24..28]),
            pre_release: read_u32(&bytes[28..32]),
        })
    }

    /// Encodes the version as an on-chain word.
    #[must_use]
    pub fn to_b256(&self) -> B256 {
        let mut bytes = [0u8; 32];
        bytes[8..16].copy_from_slice(&self.build);
        bytes[16..20].copy_from_slice(&self.major.to_be_bytes());
        bytes[20..24].copy_from_slice(&self.minor.to_be_bytes());
        bytes[24..28].copy_from_slice(&self.patch.to_be_bytes());
        bytes[28..32].copy_from_slice(&self.pre_release.to_be_bytes());
        B256::from(bytes)
    }

    /// Compares `self` (the local version) against `other`.
    ///
    /// Pre-release 0 is a full release and ranks above any pre-release of the same
    /// major, minor and patch.
    #[must_use]
    pub fn compare(&self, other: &Self) -> ProtocolVersionComparison {
        use ProtocolVersionComparison as Cmp;

        if self.is_empty() || other.is_empty() {
            return Cmp::EmptyVersion;
        }
        if self.build != other.build {
            return Cmp::DiffBuild;
        }

        let ordered = [
            (self.major, other.major, Cmp::AheadMajor, Cmp::OutdatedMajor),
            (self.minor, other.minor, Cmp::AheadMinor, Cmp::OutdatedMinor),
            (self.patch, other.patch, Cmp::AheadPatch, Cmp::OutdatedPatch),
        ];
        for (local, remote, ahead, outdated) in ordered {
            if local > remote {
                return ahead;
            }
            if local < remote {
                return outdated;
            }
        }

        match (self.pre_release, other.pre_release) {
            (a, b) if a == b => Cmp::Equal,
            (0, _) => Cmp::AheadPrerelease,
            (_, 0) => Cmp::OutdatedPrerelease,
            (a, b) if a > b => Cmp::AheadPrerelease,
            _ => Cmp::OutdatedPrerelease,
        }
    }
}

fn read_u32(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(bytes);
    u32::from_be_bytes(buf)
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}.{}", self.major, self.minor, self.patch)?;
        if self.pre_release != 0 {
            write!(f, "-{}", self.pre_release)?;
        }
        if self.build != [0; 8] {
            write!(f, "+0x{}", alloy_primitives::hex::encode(self.build))?;
        }
        Ok(())
    }
}

impl TryFrom<B256> for ProtocolVersion {
    type Error = ProtocolVersionError;

    fn try_from(word: B256) -> Result<Self, Self::Error> {
        Self::from_b256(word)
    }
}

/// Protocol version decoding errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolVersionError {
    /// Only version type 0 is understood.
    #[error("unsupported protocol version type: {0}")]
    UnsupportedVersionType(u8),

    /// Reserved bytes must be zero for version type 0.
    #[error("reserved protocol version bytes must be zero")]
    ReservedBytesSet,
}
