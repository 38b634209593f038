// Rust guideline compliant 2026-02-06

//! Output formatting module for the sorm CLI.
//!
//! This module provides functionality for formatting schema plans, table
//! listings and search schemas in various output formats (JSON, table,
//! plain text).

use scylla_orm_core::{ObjectKind, OutputFormat, SchemaObject, Table};
use serde_json::json;
use tabled::{builder::Builder, settings::Style};

/// Output formatter trait.
///
/// Defines the interface for formatting schema data in different output formats.
pub trait OutputFormatter {
    /// Formats an ordered DDL plan.
    fn format_plan(&self, plan: &[SchemaObject]) -> String;

    /// Formats a list of table definitions.
    fn format_tables(&self, tables: &[Table]) -> String;

    /// Formats the search index schema of a table.
    fn format_search_schema(&self, table: &Table) -> String;

    /// Formats an error message for display.
    fn format_error(&self, error: &str) -> String;
}

fn kind_label(kind: ObjectKind) -> &'static str {
    match kind {
        ObjectKind::Keyspace => "keyspace",
        ObjectKind::Table => "table",
        ObjectKind::View => "view",
    }
}

/// JSON output formatter.
///
/// Formats schema data as valid JSON for machine consumption.
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_plan(&self, plan: &[SchemaObject]) -> String {
        let output = json!({
            "statements": plan,
            "total": plan.len(),
        });
        serde_json::to_string_pretty(&output)
            .unwrap_or_else(|_| json!({ "error": "Failed to serialize plan" }).to_string())
    }

    fn format_tables(&self, tables: &[Table]) -> String {
        let entries: Vec<serde_json::Value> = tables
            .iter()
            .map(|table| {
                json!({
                    "keyspace": table.keyspace(),
                    "name": table.name(),
                    "columns": table.column_defs(),
                    "primary_key": table.primary_key(),
                    "views": table.view_names(),
                })
            })
            .collect();
        let output = json!({
            "tables": entries,
            "total": tables.len(),
        });
        serde_json::to_string_pretty(&output)
            .unwrap_or_else(|_| json!({ "error": "Failed to serialize tables" }).to_string())
    }

    fn format_search_schema(&self, table: &Table) -> String {
        let output = json!({
            "table": table.qualified_name(),
            "schema": table.search_schema(),
        });
        serde_json::to_string_pretty(&output)
            .unwrap_or_else(|_| json!({ "error": "Failed to serialize search schema" }).to_string())
    }

    fn format_error(&self, error: &str) -> String {
        json!({ "error": error }).to_string()
    }
}

/// Table output formatter.
///
/// Formats schema data as human-readable tables.
pub struct TableFormatter;

impl OutputFormatter for TableFormatter {
    fn format_plan(&self, plan: &[SchemaObject]) -> String {
        if plan.is_empty() {
            return "No tables defined.".to_string();
        }

        let mut builder = Builder::default();
        builder.push_record(vec!["#", "Kind", "Object"]);
        for (idx, object) in plan.iter().enumerate() {
            builder.push_record(vec![
                (idx + 1).to_string(),
                kind_label(object.kind).to_string(),
                object.qualified_name(),
            ]);
        }

        let mut table = builder.build();
        table.with(Style::modern());
        table.to_string()
    }

    fn format_tables(&self, tables: &[Table]) -> String {
        if tables.is_empty() {
            return "No tables defined.".to_string();
        }

        let mut builder = Builder::default();
        builder.push_record(vec!["Keyspace", "Table", "Primary Key", "Columns", "Views"]);
        for table in tables {
            builder.push_record(vec![
                table.keyspace().to_string(),
                table.name().to_string(),
                table.primary_key().join(", "),
                table.column_defs().len().to_string(),
                table.view_names().join(", "),
            ]);
        }

        let mut rendered = builder.build();
        rendered.with(Style::modern());
        rendered.to_string()
    }

    fn format_search_schema(&self, table: &Table) -> String {
        let mut builder = Builder::default();
        builder.push_record(vec!["Field Type", "Columns"]);
        for (field_type, columns) in table.search_schema() {
            builder.push_record(vec![field_type.to_string(), columns.join(", ")]);
        }

        let mut rendered = builder.build();
        rendered.with(Style::modern());
        rendered.to_string()
    }

    fn format_error(&self, error: &str) -> String {
        format!("Error: {}", error)
    }
}

/// Plain text output formatter.
///
/// Formats DDL as executable CQL and listings as simple lines.
pub struct PlainFormatter;

impl OutputFormatter for PlainFormatter {
    fn format_plan(&self, plan: &[SchemaObject]) -> String {
        let mut output = String::new();
        for object in plan {
            output.push_str(&object.statement);
            output.push_str(";\n");
        }
        output
    }

    fn format_tables(&self, tables: &[Table]) -> String {
        let mut output = String::new();
        for table in tables {
            output.push_str(&format!(
                "{} ({})\n",
                table.qualified_name(),
                table.primary_key().join(", ")
            ));
        }
        output
    }

    fn format_search_schema(&self, table: &Table) -> String {
        let mut output = String::new();
        for (field_type, columns) in table.search_schema() {
            output.push_str(&format!("{} {}\n", field_type, columns.join(" ")));
        }
        output
    }

    fn format_error(&self, error: &str) -> String {
        format!("Error: {}", error)
    }
}

/// Renders an error and its causes on one line.
///
/// Causes whose text already appears earlier in the line are skipped, so
/// wrapped errors that repeat their source are not printed twice.
pub fn error_message(error: &anyhow::Error) -> String {
    let mut message = String::new();
    for cause in error.chain() {
        let text = cause.to_string();
        if message.contains(&text) {
            continue;
        }
        if !message.is_empty() {
            message.push_str(": ");
        }
        message.push_str(&text);
    }
    message
}

/// Factory function to create an appropriate formatter.
pub fn create_formatter(format: OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Table => Box::new(TableFormatter),
        OutputFormat::Plain => Box::new(PlainFormatter),
    }
}
