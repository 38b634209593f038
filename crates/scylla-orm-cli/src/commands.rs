// Rust guideline compliant 2026-02-06

//! Command implementations for the sorm CLI.

pub mod check;
pub mod ddl;
pub mod env;
pub mod init;
pub mod search_schema;
pub mod tables;

use anyhow::{Context, Result};
use scylla_orm_core::{Config, MetaData, SchemaFile};
use std::path::Path;
use tracing::debug;

/// Loads and validates a schema file into a table registry.
///
/// Table specs without a keyspace use `config.default_keyspace`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if a table
/// definition is invalid.
pub fn load_metadata(schema: &Path, config: &Config) -> Result<MetaData> {
    let file = SchemaFile::load(schema)
        .with_context(|| format!("Failed to load schema {}", schema.display()))?;
    let tables = file
        .into_tables(config.default_keyspace.as_deref())
        .with_context(|| format!("Invalid schema {}", schema.display()))?;
    debug!(schema = %schema.display(), tables = tables.len(), "loaded schema file");
    Ok(MetaData::with_tables(tables)?)
}
