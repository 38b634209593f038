// Rust guideline compliant 2026-02-06

//! Implementation of the `sorm ddl` command.
//!
//! Prints the ordered statements that create every keyspace, table and
//! materialized view of a schema file.

use crate::commands::load_metadata;
use crate::OutputFormatter;
use anyhow::Result;
use scylla_orm_core::Config;
use std::path::Path;

/// Renders the DDL plan of a schema file.
///
/// # Errors
///
/// Returns an error if the schema file cannot be loaded or is invalid.
pub fn execute(schema: &Path, config: &Config, formatter: &dyn OutputFormatter) -> Result<String> {
    let metadata = load_metadata(schema, config)?;
    let plan = metadata.plan(config);
    Ok(formatter.format_plan(&plan))
}
