// Rust guideline compliant 2026-02-06

//! Configuration management for scylla-orm.

use crate::{ApplicationEnvironment, Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Name of the configuration file inside the config directory.
pub const CONFIG_FILE: &str = "sorm.toml";

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// JSON output format.
    Json,
    /// Human-readable table format.
    #[default]
    Table,
    /// Plain text format.
    Plain,
}

/// Keyspace replication strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "class")]
pub enum Replication {
    /// Single-datacenter replication.
    #[serde(rename = "SimpleStrategy")]
    Simple {
        /// Number of replicas.
        replication_factor: u32,
    },
    /// Per-datacenter replication.
    #[serde(rename = "NetworkTopologyStrategy")]
    NetworkTopology {
        /// Replicas per datacenter name.
        datacenters: BTreeMap<String, u32>,
    },
}

impl Default for Replication {
    fn default() -> Self {
        Replication::Simple {
            replication_factor: 1,
        }
    }
}

impl Replication {
    /// Renders the CQL replication map.
    pub fn to_cql(&self) -> String {
        match self {
            Replication::Simple { replication_factor } => format!(
                "{{'class': 'SimpleStrategy', 'replication_factor': {}}}",
                replication_factor
            ),
            Replication::NetworkTopology { datacenters } => {
                let mut parts = vec!["'class': 'NetworkTopologyStrategy'".to_string()];
                parts.extend(
                    datacenters
                        .iter()
                        .map(|(dc, factor)| format!("'{}': {}", dc, factor)),
                );
                format!("{{{}}}", parts.join(", "))
            }
        }
    }
}

/// Settings that vary per application environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// Whether keyspaces use the commit log.
    #[serde(default = "default_true")]
    pub durable_writes: bool,
    /// Replication used when creating keyspaces.
    #[serde(default)]
    pub replication: Replication,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            replication: Replication::default(),
            durable_writes: true,
        }
    }
}

impl EnvironmentConfig {
    /// Renders `CREATE KEYSPACE IF NOT EXISTS` with these settings.
    pub fn create_keyspace_statement(&self, keyspace: &str) -> String {
        format!(
            "CREATE KEYSPACE IF NOT EXISTS {} WITH replication = {} AND durable_writes = {}",
            keyspace,
            self.replication.to_cql(),
            self.durable_writes
        )
    }
}

fn default_true() -> bool {
    true
}

/// Configuration for scylla-orm behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Keyspace for table specs that do not name one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_keyspace: Option<String>,

    /// Default output format for commands.
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Whether `create_all` also creates missing keyspaces.
    #[serde(default = "default_true")]
    pub create_keyspaces: bool,

    /// Per-environment settings keyed by environment name.
    #[serde(default)]
    pub environments: BTreeMap<String, EnvironmentConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_keyspace: None,
            output_format: OutputFormat::default(),
            create_keyspaces: true,
            environments: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Loads configuration from file and environment variables.
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values
    /// 2. Configuration file at `<config_dir>/sorm.toml`
    /// 3. Environment variables with `SORM_` prefix
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration file exists but cannot be read
    /// - Configuration file contains invalid TOML
    /// - Configuration values fail validation
    pub fn load(config_dir: &Path) -> Result<Self> {
        let mut config = Self::default();

        let config_path = config_dir.join(CONFIG_FILE);
        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            config = toml::from_str(&content)
                .map_err(|e| Error::InvalidConfig(format!("Invalid config file: {}", e)))?;
        }

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Applies environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `SORM_DEFAULT_KEYSPACE` - Keyspace for specs without one
    /// - `SORM_OUTPUT_FORMAT` - Output format (json/table/plain)
    /// - `SORM_CREATE_KEYSPACES` - Create missing keyspaces (true/false)
    ///
    /// # Errors
    ///
    /// Returns an error if environment variable values are invalid.
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("SORM_DEFAULT_KEYSPACE") {
            self.default_keyspace = Some(val);
        }

        if let Ok(val) = std::env::var("SORM_OUTPUT_FORMAT") {
            self.output_format = match val.as_str() {
                "json" => OutputFormat::Json,
                "table" => OutputFormat::Table,
                "plain" => OutputFormat::Plain,
                _ => {
                    return Err(Error::InvalidConfig(
                        "SORM_OUTPUT_FORMAT must be json, table, or plain".to_string(),
                    ))
                }
            };
        }

        if let Ok(val) = std::env::var("SORM_CREATE_KEYSPACES") {
            self.create_keyspaces = val.parse().map_err(|_| {
                Error::InvalidConfig("SORM_CREATE_KEYSPACES must be true or false".to_string())
            })?;
        }

        Ok(())
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - default_keyspace is not a valid keyspace name
    /// - a replication factor is zero
    /// - a NetworkTopologyStrategy lists no datacenters
    fn validate(&self) -> Result<()> {
        if let Some(keyspace) = &self.default_keyspace {
            crate::table::validate_name("keyspace", keyspace)
                .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        }

        for (name, env) in &self.environments {
            match &env.replication {
                Replication::Simple { replication_factor } if *replication_factor == 0 => {
                    return Err(Error::InvalidConfig(format!(
                        "environments.{}: replication_factor must be greater than 0",
                        name
                    )));
                }
                Replication::NetworkTopology { datacenters } => {
                    if datacenters.is_empty() {
                        return Err(Error::InvalidConfig(format!(
                            "environments.{}: NetworkTopologyStrategy needs at least one datacenter",
                            name
                        )));
                    }
                    if let Some((dc, _)) = datacenters.iter().find(|(_, factor)| **factor == 0) {
                        return Err(Error::InvalidConfig(format!(
                            "environments.{}: replication factor of {} must be greater than 0",
                            name, dc
                        )));
                    }
                }
                Replication::Simple { .. } => {}
            }
        }

        Ok(())
    }

    /// Settings of a named environment, defaults if it is not configured.
    pub fn environment(&self, name: &str) -> EnvironmentConfig {
        self.environments.get(name).cloned().unwrap_or_default()
    }

    /// Settings of the current application environment.
    pub fn active_environment(&self) -> EnvironmentConfig {
        self.environment(&ApplicationEnvironment::get_environment())
    }

    /// Saves the configuration to `<config_dir>/sorm.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be created or written
    /// - Serialization fails
    pub fn save(&self, config_dir: &Path) -> Result<()> {
        let config_path = config_dir.join(CONFIG_FILE);
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::InvalidConfig(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    fn clear_all_env_vars() {
        std::env::remove_var("SORM_DEFAULT_KEYSPACE");
        std::env::remove_var("SORM_OUTPUT_FORMAT");
        std::env::remove_var("SORM_CREATE_KEYSPACES");
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.default_keyspace, None);
        assert_eq!(config.output_format, OutputFormat::Table);
        assert!(config.create_keyspaces);
        assert!(config.environments.is_empty());
    }

    #[test]
    #[serial]
    fn test_config_load_missing_file() {
        clear_all_env_vars();
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load(temp_dir.path()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    #[serial]
    fn test_config_load_from_file() {
        clear_all_env_vars();
        let temp_dir = TempDir::new().unwrap();
        let content = r#"
default_keyspace = "app"
output_format = "json"
create_keyspaces = false

[environments.prod]
durable_writes = true

[environments.prod.replication]
class = "NetworkTopologyStrategy"
datacenters = { eu_west = 3, us_east = 2 }

[environments.dev.replication]
class = "SimpleStrategy"
replication_factor = 1
"#;
        std::fs::write(temp_dir.path().join(CONFIG_FILE), content).unwrap();

        let config = Config::load(temp_dir.path()).unwrap();
        assert_eq!(config.default_keyspace.as_deref(), Some("app"));
        assert_eq!(config.output_format, OutputFormat::Json);
        assert!(!config.create_keyspaces);
        assert_eq!(
            config.environment("prod").create_keyspace_statement("app"),
            "CREATE KEYSPACE IF NOT EXISTS app WITH replication = \
             {'class': 'NetworkTopologyStrategy', 'eu_west': 3, 'us_east': 2} AND durable_writes = true"
        );
        assert_eq!(
            config.environment("dev").replication,
            Replication::Simple {
                replication_factor: 1
            }
        );
    }

    #[test]
    fn test_unknown_environment_uses_defaults() {
        let config = Config::default();
        assert_eq!(config.environment("qa"), EnvironmentConfig::default());
    }

    #[test]
    #[serial]
    fn test_config_validation_zero_replication() {
        clear_all_env_vars();
        let temp_dir = TempDir::new().unwrap();
        let content = r#"
[environments.dev.replication]
class = "SimpleStrategy"
replication_factor = 0
"#;
        std::fs::write(temp_dir.path().join(CONFIG_FILE), content).unwrap();
        assert!(Config::load(temp_dir.path()).is_err());
    }

    #[test]
    #[serial]
    fn test_config_validation_invalid_keyspace() {
        clear_all_env_vars();
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join(CONFIG_FILE), "default_keyspace = \"my-app\"").unwrap();
        assert!(Config::load(temp_dir.path()).is_err());
    }

    #[test]
    #[serial]
    fn test_config_env_overrides() {
        clear_all_env_vars();
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join(CONFIG_FILE), "default_keyspace = \"app\"").unwrap();

        std::env::set_var("SORM_DEFAULT_KEYSPACE", "analytics");
        std::env::set_var("SORM_OUTPUT_FORMAT", "plain");
        std::env::set_var("SORM_CREATE_KEYSPACES", "false");
        let config = Config::load(temp_dir.path()).unwrap();
        assert_eq!(config.default_keyspace.as_deref(), Some("analytics"));
        assert_eq!(config.output_format, OutputFormat::Plain);
        assert!(!config.create_keyspaces);

        clear_all_env_vars();
    }

    #[test]
    #[serial]
    fn test_config_env_invalid_values() {
        clear_all_env_vars();
        let temp_dir = TempDir::new().unwrap();

        std::env::set_var("SORM_OUTPUT_FORMAT", "yaml");
        assert!(Config::load(temp_dir.path()).is_err());
        clear_all_env_vars();

        std::env::set_var("SORM_CREATE_KEYSPACES", "maybe");
        assert!(Config::load(temp_dir.path()).is_err());
        clear_all_env_vars();
    }

    #[test]
    #[serial]
    fn test_config_save_and_load() {
        clear_all_env_vars();
        let temp_dir = TempDir::new().unwrap();

        let mut original = Config {
            default_keyspace: Some("app".to_string()),
            output_format: OutputFormat::Json,
            create_keyspaces: false,
            environments: BTreeMap::new(),
        };
        original.environments.insert(
            "prod".to_string(),
            EnvironmentConfig {
                replication: Replication::Simple {
                    replication_factor: 3,
                },
                durable_writes: false,
            },
        );

        original.save(temp_dir.path()).unwrap();
        let loaded = Config::load(temp_dir.path()).unwrap();
        assert_eq!(original, loaded);
    }
}
