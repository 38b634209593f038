// Rust guideline compliant 2026-02-06

//! Implementation of the `sorm init` command.
//!
//! Writes a default `sorm.toml` with `dev` and `prod` environments.

use anyhow::Result;
use scylla_orm_core::config::CONFIG_FILE;
use scylla_orm_core::{Config, EnvironmentConfig, Replication};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::info;

/// Initializes configuration in `config_dir`.
///
/// An existing `sorm.toml` is left untouched.
///
/// # Errors
///
/// Returns an error if the directory or the file cannot be written.
pub fn execute(config_dir: &Path) -> Result<String> {
    if !config_dir.exists() {
        fs::create_dir_all(config_dir)?;
    }

    let config_path = config_dir.join(CONFIG_FILE);
    if config_path.exists() {
        return Ok(format!("{} already exists", config_path.display()));
    }

    default_config().save(config_dir)?;
    info!(path = %config_path.display(), "wrote default configuration");
    Ok(format!("✓ Created {}", config_path.display()))
}

/// Default configuration written by `sorm init`.
pub fn default_config() -> Config {
    let mut environments = BTreeMap::new();
    environments.insert("dev".to_string(), EnvironmentConfig::default());
    environments.insert(
        "prod".to_string(),
        EnvironmentConfig {
            durable_writes: true,
            replication: Replication::NetworkTopology {
                datacenters: BTreeMap::from([("datacenter1".to_string(), 3)]),
            },
        },
    );

    Config {
        environments,
        ..Config::default()
    }
}
