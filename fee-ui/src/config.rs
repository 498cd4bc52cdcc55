//! Session configuration.
//!
//! Values come from three layers, highest priority first: command line
//! flags, an optional TOML config file, built-in defaults.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::preferences::DEFAULT_PREFERENCES_FILE;

/// Config file picked up from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "fee-estimator.toml";

pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Catalogue CSV to price from. The built-in schedule when unset.
    pub catalogue: Option<PathBuf>,
    pub preferences: PathBuf,
    /// EnvFilter directive used when `RUST_LOG` is not set.
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalogue: None,
            preferences: PathBuf::from(DEFAULT_PREFERENCES_FILE),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_file: None,
        }
    }
}

/// Values given on the command line. `None` leaves the lower layer alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub catalogue: Option<PathBuf>,
    pub preferences: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_toml_str(
        content: &str,
        path: &Path,
    ) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content, path)
    }

    /// Builds the effective configuration.
    ///
    /// An explicit `config_path` must exist. Without one, [`DEFAULT_CONFIG_FILE`]
    /// is used if present, otherwise the defaults.
    pub fn resolve(
        config_path: Option<&Path>,
        overrides: ConfigOverrides,
    ) -> Result<Self, ConfigError> {
        let base = match config_path {
            Some(path) => Self::load(path)?,
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::load(fallback)?
                } else {
                    Self::default()
                }
            }
        };

        let config = base.with_overrides(overrides);
        debug!(?config, "configuration resolved");
        Ok(config)
    }

    pub fn with_overrides(
        mut self,
        overrides: ConfigOverrides,
    ) -> Self {
        if overrides.catalogue.is_some() {
            self.catalogue = overrides.catalogue;
        }
        if let Some(preferences) = overrides.preferences {
            self.preferences = preferences;
        }
        if let Some(log_level) = overrides.log_level {
            self.log_level = log_level;
        }
        if overrides.log_file.is_some() {
            self.log_file = overrides.log_file;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = AppConfig::from_toml_str("", Path::new("empty.toml")).unwrap();

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.preferences, PathBuf::from("preferences.toml"));
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn file_values_replace_defaults() {
        let content = r#"
            catalogue = "rates/gold_coast.csv"
            log_level = "debug"
        "#;

        let config = AppConfig::from_toml_str(content, Path::new("fee.toml")).unwrap();

        assert_eq!(config.catalogue, Some(PathBuf::from("rates/gold_coast.csv")));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.preferences, PathBuf::from("preferences.toml"));
        assert_eq!(config.log_file, None);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = AppConfig::from_toml_str("colour = \"blue\"", Path::new("fee.toml")).unwrap_err();

        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("fee.toml"));
    }

    #[test]
    fn overrides_win_over_file_values() {
        let base = AppConfig {
            catalogue: Some(PathBuf::from("file.csv")),
            log_level: "warn".to_string(),
            ..AppConfig::default()
        };

        let config = base.with_overrides(ConfigOverrides {
            log_level: Some("trace".to_string()),
            log_file: Some(PathBuf::from("session.log")),
            ..ConfigOverrides::default()
        });

        assert_eq!(config.catalogue, Some(PathBuf::from("file.csv")));
        assert_eq!(config.log_level, "trace");
        assert_eq!(config.log_file, Some(PathBuf::from("session.log")));
    }

    #[test]
    fn resolve_reads_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fee.toml");
        fs::write(&path, "preferences = \"prefs.toml\"\n").unwrap();

        let config = AppConfig::resolve(Some(&path), ConfigOverrides::default()).unwrap();

        assert_eq!(config.preferences, PathBuf::from("prefs.toml"));
    }

    #[test]
    fn resolve_fails_for_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();

        let err = AppConfig::resolve(Some(&dir.path().join("absent.toml")), ConfigOverrides::default())
            .unwrap_err();

        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
