#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/refcell/keel/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

use std::{
    fmt::Debug,
    fs,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Last durable run state of the sequencer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SequencerState {
    /// Nothing has been recorded.
    #[default]
    Unset,
    /// The sequencer was last started.
    Started,
    /// The sequencer was last stopped.
    Stopped,
}

impl SequencerState {
    /// Returns true if a run state has been recorded.
    #[must_use]
    pub const fn is_set(&self) -> bool {
        !matches!(self, Self::Unset)
    }
}

/// Store for sequencer run state that survives restarts.
///
/// Implementations decide their own retry policy; callers treat every error as final.
pub trait ConfigPersistence: Debug + Send + Sync {
    /// Records that the sequencer was started.
    fn sequencer_started(&self) -> Result<(), PersistenceError>;

    /// Records that the sequencer was stopped.
    fn sequencer_stopped(&self) -> Result<(), PersistenceError>;

    /// Reads the last recorded run state.
    fn sequencer_state(&self) -> Result<SequencerState, PersistenceError>;
}

/// On-disk layout of the persisted state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sequencer_started: Option<bool>,
}

/// File backed [`ConfigPersistence`].
///
/// State is kept as a JSON document. A missing file reads as [`SequencerState::Unset`].
#[derive(Debug)]
pub struct ActiveConfigPersistence {
    path: PathBuf,
    lock: Mutex<()>,
}

impl ActiveConfigPersistence {
    /// Creates a store backed by the file at `path`.
    ///
    /// The file is not touched until the first read or write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), lock: Mutex::new(()) }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, started: bool) -> Result<(), PersistenceError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let state = PersistedState { sequencer_started: Some(started) };
        let json = serde_json::to_string_pretty(&state)
            .map_err(|source| PersistenceError::Serialize { path: self.path.clone(), source })?;

        // Write to temporary file in the same directory
        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, json)?;

        // Atomically rename to final location
        fs::rename(&temp_path, &self.path)?;

        tracing::debug!(path = %self.path.display(), started, "persisted sequencer state");
        Ok(())
    }

    fn read(&self) -> Result<PersistedState, PersistenceError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        match fs::read_to_string(&self.path) {
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|source| PersistenceError::Serialize { path: self.path.clone(), source }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(PersistedState::default()),
            Err(e) => Err(PersistenceError::Io(e)),
        }
    }
}

impl ConfigPersistence for ActiveConfigPersistence {
    fn sequencer_started(&self) -> Result<(), PersistenceError> {
        self.persist(true)
    }

    fn sequencer_stopped(&self) -> Result<(), PersistenceError> {
        self.persist(false)
    }

    fn sequencer_state(&self) -> Result<SequencerState, PersistenceError> {
        Ok(match self.read()?.sequencer_started {
            None => SequencerState::Unset,
            Some(true) => SequencerState::Started,
            Some(false) => SequencerState::Stopped,
        })
    }
}

/// A [`ConfigPersistence`] that records nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledConfigPersistence;

impl ConfigPersistence for DisabledConfigPersistence {
    fn sequencer_started(&self) -> Result<(), PersistenceError> {
        Ok(())
    }

    fn sequencer_stopped(&self) -> Result<(), PersistenceError> {
        Ok(())
    }

    fn sequencer_state(&self) -> Result<SequencerState, PersistenceError> {
        Ok(SequencerState::Unset)
    }
}

/// Errors that can occur while reading or writing persisted state.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// I/O error occurred while reading or writing the state file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The state file could not be encoded or decoded.
    #[error("config file ({}) is not valid JSON: {source}", .path.display())]
    Serialize {
        /// Path of the state file.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn store() -> (TempDir, ActiveConfigPersistence) {
        let dir = TempDir::new().unwrap();
        let store = ActiveConfigPersistence::new(dir.path().join("state.json"));
        (dir, store)
    }

    #[test]
    fn test_missing_file_is_unset() {
        let (_dir, store) = store();
        assert_eq!(store.sequencer_state().unwrap(), SequencerState::Unset);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_started_then_stopped() {
        let (_dir, store) = store();

        store.sequencer_started().unwrap();
        assert_eq!(store.sequencer_state().unwrap(), SequencerState::Started);

        store.sequencer_stopped().unwrap();
        assert_eq!(store.sequencer_state().unwrap(), SequencerState::Stopped);
    }

    #[test]
    fn test_state_survives_new_store() {
        let (dir, store) = store();
        store.sequencer_stopped().unwrap();
        drop(store);

        let reopened = ActiveConfigPersistence::new(dir.path().join("state.json"));
        assert_eq!(reopened.sequencer_state().unwrap(), SequencerState::Stopped);
    }

    #[test]
    fn test_file_layout() {
        let (_dir, store) = store();
        store.sequencer_started().unwrap();
        let contents = fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(value, serde_json::json!({ "sequencerStarted": true }));
        assert!(!store.path().with_extension("tmp").exists());
    }

    #[test]
    fn test_empty_object_is_unset() {
        let (_dir, store) = store();
        fs::write(store.path(), "{}").unwrap();
        assert_eq!(store.sequencer_state().unwrap(), SequencerState::Unset);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let (_dir, store) = store();
        fs::write(store.path(), "not json").unwrap();
        let err = store.sequencer_state().unwrap_err();
        assert!(matches!(err, PersistenceError::Serialize { .. }));
        assert!(err.to_string().contains("is not valid JSON"));
    }

    #[test]
    fn test_unreadable_path_is_an_error() {
        let (dir, _) = store();
        // A directory cannot be read as a file.
        let store = ActiveConfigPersistence::new(dir.path());
        assert!(matches!(store.sequencer_state(), Err(PersistenceError::Io(_))));
    }

    #[test]
    fn test_disabled_always_unset() {
        let store = DisabledConfigPersistence;
        store.sequencer_started().unwrap();
        store.sequencer_stopped().unwrap();
        assert_eq!(store.sequencer_state().unwrap(), SequencerState::Unset);
    }

    #[test]
    fn test_is_set() {
        assert!(!SequencerState::Unset.is_set());
        assert!(SequencerState::Started.is_set());
        assert!(SequencerState::Stopped.is_set());
    }
}
