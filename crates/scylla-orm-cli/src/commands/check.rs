// Rust guideline compliant 2026-02-06

//! Implementation of the `sorm check` command.

use crate::commands::load_metadata;
use anyhow::Result;
use scylla_orm_core::Config;
use serde_json::json;
use std::path::Path;

/// Validates a schema file and summarizes it.
///
/// # Errors
///
/// Returns the validation error if the schema is invalid.
pub fn execute(schema: &Path, config: &Config, json_output: bool) -> Result<String> {
    let metadata = load_metadata(schema, config)?;
    let tables = metadata.tables().len();
    let views: usize = metadata.tables().iter().map(|t| t.views().len()).sum();
    let keyspaces = metadata.keyspaces();

    if json_output {
        let output = json!({
            "valid": true,
            "schema": schema.display().to_string(),
            "keyspaces": keyspaces,
            "tables": tables,
            "views": views,
        });
        return Ok(serde_json::to_string_pretty(&output)?);
    }

    Ok(format!(
        "✓ {} is valid: {} keyspace(s), {} table(s), {} view(s)",
        schema.display(),
        keyspaces.len(),
        tables,
        views
    ))
}
