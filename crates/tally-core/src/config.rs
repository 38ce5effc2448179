//! Tracker configuration
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. An explicit path, or the override in the data dir
//!    (~/.local/share/tally/config.toml) when it exists
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! `TALLY_DATA_FILE` in the environment replaces the configured data file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/tally.toml");

/// Environment variable overriding the data file location
pub const DATA_FILE_ENV: &str = "TALLY_DATA_FILE";

/// Resolved tracker configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Ledger document path
    pub data_file: PathBuf,
    /// Seed a fresh classifier with the built-in examples
    pub seed: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("expense_data.json"),
            seed: true,
        }
    }
}

impl Config {
    /// Load config from `path`, the data-dir override, or embedded defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = read_config(path)?;
        config.apply_env_override(std::env::var(DATA_FILE_ENV).ok());
        Ok(config)
    }

    /// Replace the data file with a non-empty environment value
    fn apply_env_override(&mut self, data_file: Option<String>) {
        if let Some(value) = data_file.filter(|v| !v.trim().is_empty()) {
            debug!("{} overrides data file: {}", DATA_FILE_ENV, value);
            self.data_file = PathBuf::from(value);
        }
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("tally").join("config.toml"))
}

/// Read config without environment overrides
///
/// An explicit path must exist; the data-dir override is optional.
fn read_config(path: Option<&Path>) -> Result<Config> {
    let content = match path {
        Some(path) => fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config {}: {}", path.display(), e))
        })?,
        None => match default_config_path() {
            Some(default_path) if default_path.exists() => {
                debug!("Using config override at {}", default_path.display());
                fs::read_to_string(&default_path)
                    .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?
            }
            _ => DEFAULT_CONFIG.to_string(),
        },
    };

    parse_config(&content)
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    storage: Option<RawStorage>,
    classifier: Option<RawClassifier>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawStorage {
    data_file: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawClassifier {
    seed: Option<bool>,
}

/// Parse config from TOML content, filling gaps with defaults
fn parse_config(content: &str) -> Result<Config> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = Config::default();

    if let Some(storage) = raw.storage {
        if let Some(data_file) = storage.data_file {
            config.data_file = data_file;
        }
    }

    if let Some(classifier) = raw.classifier {
        if let Some(seed) = classifier.seed {
            config.seed = seed;
        }
    }

    Ok(config)
}
