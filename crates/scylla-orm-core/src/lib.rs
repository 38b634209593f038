// Rust guideline compliant 2026-02-06

//! scylla-orm Core Library
//!
//! This crate provides a thin ORM layer over a ScyllaDB/Cassandra client:
//! - Table and materialized view definitions (code or TOML/JSON schema files)
//! - Typed columns, predicates and aggregates
//! - Parameterised SELECT/UPDATE/DELETE/INSERT builders
//! - Ordered creation of all keyspaces, tables and views
//! - Configuration and the process-wide application environment
//! - Error types and result handling
//!
//! Statements are executed through the [`Session`] trait; the CQL driver
//! itself lives outside this crate.

pub mod column;
pub mod config;
pub mod environment;
pub mod error;
pub mod metadata;
pub mod query;
pub mod session;
pub mod table;
pub mod types;
pub mod value;

pub use column::{Aggregate, AggregateExpr, Column, ColumnExpr, Operator, Selector};
pub use config::{Config, EnvironmentConfig, OutputFormat, Replication};
pub use environment::ApplicationEnvironment;
pub use error::{Error, Result};
pub use metadata::{CreateReport, MetaData, ObjectKind, SchemaObject};
pub use query::{BuiltQuery, Delete, Insert, Query, Select, Update};
pub use session::{QueryResult, RecordedStatement, RecordingSession, Session};
pub use table::{ClusteringOrder, ColumnDef, SchemaFile, Table, TableBuilder, TableSpec, ViewDef};
pub use types::{CqlType, SearchFieldType};
pub use value::{CqlValue, Row};
