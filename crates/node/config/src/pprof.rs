//! Profiling configuration.

use std::{fmt, path::PathBuf, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rpc::is_valid_port;

/// pprof profile kinds that can be written to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileType {
    /// CPU samples.
    Cpu,
    /// Live heap allocations.
    Heap,
    /// Stack traces of all running tasks.
    Goroutine,
    /// Stack traces that led to new threads.
    Threadcreate,
    /// Blocking on synchronization primitives.
    Block,
    /// Lock contention.
    Mutex,
    /// All past allocations.
    Allocs,
}

impl ProfileType {
    /// All profile kinds.
    pub const ALL: [Self; 7] = [
        Self::Cpu,
        Self::Heap,
        Self::Goroutine,
        Self::Threadcreate,
        Self::Block,
        Self::Mutex,
        Self::Allocs,
    ];

    /// Lowercase name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cpu => "cpu",
            Self::Heap => "heap",
            Self::Goroutine => "goroutine",
            Self::Threadcreate => "threadcreate",
            Self::Block => "block",
            Self::Mutex => "mutex",
            Self::Allocs => "allocs",
        }
    }
}

impl fmt::Display for ProfileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileType {
    type Err = PprofConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| PprofConfigError::UnknownProfileType(s.to_string()))
    }
}

/// Profiling server and profile file settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PprofConfig {
    /// Serve profiles over HTTP.
    pub listen_enabled: bool,
    /// Listen address (default: 0.0.0.0).
    pub listen_addr: String,
    /// Listen port (default: 6060).
    pub listen_port: i32,
    /// Profile to write to disk, `None` disables.
    pub profile_type: Option<ProfileType>,
    /// Directory profiles are written to.
    pub profile_dir: Option<PathBuf>,
    /// File name of the written profile (default: `default.prof`).
    pub profile_filename: String,
}

impl Default for PprofConfig {
    fn default() -> Self {
        Self {
            listen_enabled: false,
            listen_addr: "0.0.0.0".to_string(),
            listen_port: 6060,
            profile_type: None,
            profile_dir: None,
            profile_filename: "default.prof".to_string(),
        }
    }
}

impl PprofConfig {
    /// Full path of the written profile, if one is configured.
    pub fn profile_path(&self) -> Option<PathBuf> {
        if self.profile_type.is_none() {
            return None;
        }
        self.profile_dir.as_ref().map(|dir| dir.join(&self.profile_filename))
    }

    /// Validates the listener and the profile destination.
    pub fn check(&self) -> Result<(), PprofConfigError> {
        if self.listen_enabled && !is_valid_port(self.listen_port) {
            return Err(PprofConfigError::InvalidPort(self.listen_port));
        }
        if let Some(profile) = self.profile_type {
            if self.profile_dir.is_none() {
                return Err(PprofConfigError::MissingProfileDir(profile));
            }
            if self.profile_filename.trim().is_empty() {
                return Err(PprofConfigError::EmptyProfileFilename);
            }
        }
        Ok(())
    }
}

/// Profiling configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PprofConfigError {
    /// Port outside `0..=65535`.
    #[error("invalid pprof port: {0}")]
    InvalidPort(i32),

    /// Unrecognized profile type name.
    #[error("unknown profile type: {0:?}")]
    UnknownProfileType(String),

    /// A profile is requested but there is nowhere to write it.
    #[error("{0} profile requires a profile directory")]
    MissingProfileDir(ProfileType),

    /// A profile is requested with a blank file name.
    #[error("profile filename is empty")]
    EmptyProfileFilename,
}
