// Rust guideline compliant 2026-02-06

//! Implementation of the `sorm tables` command.

use crate::commands::load_metadata;
use crate::OutputFormatter;
use anyhow::Result;
use scylla_orm_core::Config;
use std::path::Path;

/// Lists the tables of a schema file.
///
/// # Errors
///
/// Returns an error if the schema file cannot be loaded or is invalid.
pub fn execute(schema: &Path, config: &Config, formatter: &dyn OutputFormatter) -> Result<String> {
    let metadata = load_metadata(schema, config)?;
    Ok(formatter.format_tables(metadata.tables()))
}
