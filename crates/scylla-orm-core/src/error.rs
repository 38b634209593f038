// Rust guideline compliant 2026-02-06

//! Error types for the scylla-orm core library.

use thiserror::Error;

/// Result type alias for scylla-orm operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for scylla-orm operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML deserialization error.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid table or view definition.
    #[error("Invalid table: {0}")]
    InvalidTable(String),

    /// Column does not exist on the table.
    #[error("Unknown column: {column} on {table}")]
    UnknownColumn {
        /// Fully qualified table name.
        table: String,
        /// Requested column name.
        column: String,
    },

    /// Expressions from several tables were mixed in one query.
    #[error("Columns do not originate from the same table: expected {expected}, got {found}")]
    TableMismatch {
        /// Table the query targets.
        expected: String,
        /// Table the offending expression belongs to.
        found: String,
    },

    /// The query cannot be built as requested.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// A value does not fit the column type.
    #[error("Type mismatch on column {column}: expected {expected}, got {found}")]
    TypeMismatch {
        /// Column name.
        column: String,
        /// Declared CQL type.
        expected: String,
        /// Kind of the supplied value.
        found: String,
    },

    /// A CQL type string could not be parsed.
    #[error("Invalid CQL type: {0}")]
    InvalidType(String),

    /// Invalid configuration.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// The session failed to execute a statement.
    #[error("Session error: {0}")]
    Session(String),
}
