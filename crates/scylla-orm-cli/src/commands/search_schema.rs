// Rust guideline compliant 2026-02-06

//! Implementation of the `sorm search-schema` command.
//!
//! Groups the columns of one table by the search index field type their
//! CQL type maps to.

use crate::commands::load_metadata;
use crate::OutputFormatter;
use anyhow::{Context, Result};
use scylla_orm_core::Config;
use std::path::Path;

/// Renders the search schema of `table` (`keyspace.table`, or a bare name
/// in the default keyspace).
///
/// # Errors
///
/// Returns an error if the schema cannot be loaded, the name has no
/// keyspace and none is configured, or the table is not defined.
pub fn execute(
    schema: &Path,
    table: &str,
    config: &Config,
    formatter: &dyn OutputFormatter,
) -> Result<String> {
    let metadata = load_metadata(schema, config)?;

    let qualified = if table.contains('.') {
        table.to_string()
    } else {
        let keyspace = config
            .default_keyspace
            .as_deref()
            .context("Table name has no keyspace and no default_keyspace is configured")?;
        format!("{}.{}", keyspace, table)
    };

    let found = metadata
        .get_qualified(&qualified)
        .with_context(|| format!("Table {} is not defined in {}", qualified, schema.display()))?;
    Ok(formatter.format_search_schema(found))
}
