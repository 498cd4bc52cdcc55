//! Small persistent key/value flags that live outside the estimate itself.
//!
//! The only flag today records whether the guided tour has been finished or
//! skipped. The estimator never touches these; the session reads them once at
//! startup and writes them when the tour ends.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, info};

/// Key under which tour completion is stored.
pub const TUTORIAL_COMPLETED_KEY: &str = "calculator-tutorial-completed";

/// Default location of the preferences file, relative to the working directory.
pub const DEFAULT_PREFERENCES_FILE: &str = "preferences.toml";

#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("cannot access preferences file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("preferences file '{path}' is not valid TOML: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("cannot serialize preferences: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Storage for boolean preference flags.
pub trait PreferenceStore {
    /// Returns `None` when the flag has never been written.
    fn get_flag(
        &self,
        key: &str,
    ) -> Result<Option<bool>, PreferenceError>;

    fn set_flag(
        &mut self,
        key: &str,
        value: bool,
    ) -> Result<(), PreferenceError>;
}

/// Preferences kept in a TOML file of `key = true|false` lines.
///
/// The file is read on every access and rewritten on every change, so edits
/// made by another session are picked up. A missing file reads as empty.
#[derive(Debug, Clone)]
pub struct TomlPreferenceStore {
    path: PathBuf,
}

impl TomlPreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_all(&self) -> Result<BTreeMap<String, bool>, PreferenceError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(source) if source.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no preferences file yet");
                return Ok(BTreeMap::new());
            }
            Err(source) => {
                return Err(PreferenceError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        toml::from_str(&content).map_err(|source| PreferenceError::Parse {
            path: self.path.clone(),
            source,
        })
    }
}

impl PreferenceStore for TomlPreferenceStore {
    fn get_flag(
        &self,
        key: &str,
    ) -> Result<Option<bool>, PreferenceError> {
        Ok(self.read_all()?.get(key).copied())
    }

    fn set_flag(
        &mut self,
        key: &str,
        value: bool,
    ) -> Result<(), PreferenceError> {
        let mut values = self.read_all()?;
        values.insert(key.to_string(), value);

        let content = toml::to_string(&values)?;
        fs::write(&self.path, content).map_err(|source| PreferenceError::Io {
            path: self.path.clone(),
            source,
        })?;

        info!(path = %self.path.display(), key, value, "preference saved");
        Ok(())
    }
}

/// Preferences that vanish with the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferenceStore {
    values: HashMap<String, bool>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get_flag(
        &self,
        key: &str,
    ) -> Result<Option<bool>, PreferenceError> {
        Ok(self.values.get(key).copied())
    }

    fn set_flag(
        &mut self,
        key: &str,
        value: bool,
    ) -> Result<(), PreferenceError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn memory_store_round_trips_flags() {
        let mut store = MemoryPreferenceStore::new();

        assert_eq!(store.get_flag(TUTORIAL_COMPLETED_KEY).unwrap(), None);
        store.set_flag(TUTORIAL_COMPLETED_KEY, true).unwrap();
        assert_eq!(store.get_flag(TUTORIAL_COMPLETED_KEY).unwrap(), Some(true));
    }

    #[test]
    fn missing_file_reads_as_unset() {
        let dir = tempfile::tempdir().unwrap();
        let store = TomlPreferenceStore::new(dir.path().join("absent.toml"));

        assert_eq!(store.get_flag(TUTORIAL_COMPLETED_KEY).unwrap(), None);
    }

    #[test]
    fn file_store_persists_between_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.toml");

        TomlPreferenceStore::new(&path)
            .set_flag(TUTORIAL_COMPLETED_KEY, true)
            .unwrap();

        let reopened = TomlPreferenceStore::new(&path);
        assert_eq!(reopened.get_flag(TUTORIAL_COMPLETED_KEY).unwrap(), Some(true));

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.trim(), "calculator-tutorial-completed = true");
    }

    #[test]
    fn file_store_keeps_unrelated_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.toml");
        fs::write(&path, "compact-tables = false\n").unwrap();

        let mut store = TomlPreferenceStore::new(&path);
        store.set_flag(TUTORIAL_COMPLETED_KEY, true).unwrap();

        assert_eq!(store.get_flag("compact-tables").unwrap(), Some(false));
        assert_eq!(store.get_flag(TUTORIAL_COMPLETED_KEY).unwrap(), Some(true));
    }

    #[test]
    fn malformed_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.toml");
        fs::write(&path, "this is not toml").unwrap();

        let err = TomlPreferenceStore::new(&path)
            .get_flag(TUTORIAL_COMPLETED_KEY)
            .unwrap_err();

        assert!(matches!(err, PreferenceError::Parse { .. }));
    }
}
