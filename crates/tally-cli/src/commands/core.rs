//! Shared command utilities
//!
//! This module contains:
//! - `load_config` - Resolve config file, environment and --data flag
//! - `open_tracker` - Open the expense tracker for the configured ledger

use std::path::Path;

use anyhow::{Context, Result};
use tally_core::{Config, ExpenseTracker, LedgerStore};
use tracing::debug;

/// Load configuration, letting an explicit --data path win over everything
pub fn load_config(config_path: Option<&Path>, data: Option<&Path>) -> Result<Config> {
    let mut config = Config::load(config_path).context("Failed to load config")?;
    if let Some(data) = data {
        debug!(
            "--data overrides ledger {} with {}",
            config.data_file.display(),
            data.display()
        );
        config.data_file = data.to_path_buf();
    }
    debug!(
        "Using ledger {} (seed: {})",
        config.data_file.display(),
        config.seed
    );
    Ok(config)
}

/// Open the tracker for the configured ledger file
pub fn open_tracker(config: &Config) -> Result<ExpenseTracker> {
    ExpenseTracker::open(LedgerStore::from_config(config)).with_context(|| {
        format!(
            "Failed to open ledger at {}",
            config.data_file.display()
        )
    })
}
