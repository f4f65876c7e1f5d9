//! Protocol version halting policy.

use std::{fmt, str::FromStr};

use keel_chainspec::{ProtocolVersion, ProtocolVersionComparison};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{error, info, warn};

use crate::{CancelCause, Config, ConfigError};

/// How far behind the required protocol version the node may fall before halting.
///
/// Ordered `None < Patch < Minor < Major`. A threshold of `Minor` halts on minor and
/// major gaps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HaltSeverity {
    /// Never halt.
    #[default]
    None,
    /// Halt when a patch version behind.
    Patch,
    /// Halt when a minor version behind.
    Minor,
    /// Halt when a major version behind.
    Major,
}

impl HaltSeverity {
    /// Returns true unless the policy is [`HaltSeverity::None`].
    pub const fn is_enabled(self) -> bool {
        !matches!(self, Self::None)
    }

    /// Returns true if a gap of `observed` severity reaches this threshold.
    pub fn triggers(self, observed: Self) -> bool {
        self.is_enabled() && observed >= self
    }

    /// Maps a version comparison to the gap it represents.
    ///
    /// Only outdated major, minor or patch versions count. Pre-release gaps, build
    /// mismatches and empty versions never halt.
    pub const fn from_comparison(cmp: ProtocolVersionComparison) -> Self {
        match cmp {
            ProtocolVersionComparison::OutdatedMajor => Self::Major,
            ProtocolVersionComparison::OutdatedMinor => Self::Minor,
            ProtocolVersionComparison::OutdatedPatch => Self::Patch,
            _ => Self::None,
        }
    }

    /// The gap between the `local` version and the `required` one.
    pub fn observed(local: &ProtocolVersion, required: &ProtocolVersion) -> Self {
        Self::from_comparison(local.compare(required))
    }

    /// Name used in configuration.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Patch => "patch",
            Self::Minor => "minor",
            Self::Major => "major",
        }
    }
}

impl fmt::Display for HaltSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HaltSeverity {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "none" => Ok(Self::None),
            "patch" => Ok(Self::Patch),
            "minor" => Ok(Self::Minor),
            "major" => Ok(Self::Major),
            other => Err(ConfigError::InvalidRollupHalt(other.to_string())),
        }
    }
}

impl Serialize for HaltSeverity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for HaltSeverity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse::<Self>().map_err(serde::de::Error::custom)
    }
}

impl Config {
    /// Applies the halt policy to a protocol version signal.
    ///
    /// Returns true if the node should halt. When it should, the cancel handle is fired
    /// with a [`CancelCause::ProtocolHalt`].
    pub fn halt_maybe(&self, local: &ProtocolVersion, required: &ProtocolVersion) -> bool {
        let observed = HaltSeverity::observed(local, required);
        if !self.rollup_halt.triggers(observed) {
            if observed.is_enabled() {
                info!(
                    %local,
                    %required,
                    %observed,
                    threshold = %self.rollup_halt,
                    "Protocol version is behind, below halt threshold"
                );
            }
            return false;
        }

        error!(
            %local,
            %required,
            %observed,
            threshold = %self.rollup_halt,
            "Opted to halt, unprepared for protocol change"
        );
        match &self.cancel {
            Some(cancel) => {
                cancel.cancel(CancelCause::ProtocolHalt {
                    local: *local,
                    required: *required,
                    severity: observed,
                });
            }
            None => warn!("No cancel handle configured, node will keep running"),
        }
        true
    }
}
