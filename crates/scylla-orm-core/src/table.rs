// Rust guideline compliant 2026-02-06

//! Table and materialized view definitions.
//!
//! This module provides:
//! - [`Table`], a validated table definition with its materialized views
//! - [`TableBuilder`] for defining tables in code
//! - [`SchemaFile`] and [`TableSpec`] for defining tables in TOML or JSON
//! - DDL rendering (`CREATE TABLE` / `CREATE MATERIALIZED VIEW`)
//! - the search index schema derived from column types

use crate::{Column, CqlType, Error, Result, SearchFieldType};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// Maximum length of keyspace and table names.
pub const MAX_NAME_LEN: usize = 48;

/// CQL reserved keywords; these cannot be used as unquoted identifiers.
pub const RESERVED_KEYWORDS: &[&str] = &[
    "add", "allow", "alter", "and", "apply", "asc", "authorize", "batch", "begin", "by",
    "columnfamily", "create", "delete", "desc", "describe", "drop", "entries", "execute",
    "from", "full", "grant", "if", "in", "index", "infinity", "insert", "into", "is",
    "keyspace", "limit", "materialized", "modify", "nan", "norecursive", "not", "null", "of",
    "on", "or", "order", "primary", "rename", "replace", "revoke", "schema", "select", "set",
    "table", "to", "token", "truncate", "unlogged", "update", "use", "using", "view",
    "where", "with",
];

/// Sort order of a clustering column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusteringOrder {
    /// Ascending (the server default).
    #[default]
    Asc,
    /// Descending.
    Desc,
}

/// A column declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Column name.
    pub name: String,
    /// CQL type.
    #[serde(rename = "type")]
    pub cql_type: CqlType,
}

/// A clustering key column with its sort order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusteringColumn {
    /// Column name.
    pub name: String,
    /// Sort order.
    #[serde(default)]
    pub order: ClusteringOrder,
}

/// A materialized view of a table, keyed by other columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewDef {
    /// Suffix appended to the base table name (`<table>_<suffix>`).
    pub suffix: String,
    /// Requested primary key; the first column is the partition key.
    pub key: Vec<String>,
}

/// A validated table definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    keyspace: String,
    name: String,
    columns: Vec<ColumnDef>,
    partition_key: Vec<String>,
    clustering_key: Vec<ClusteringColumn>,
    views: Vec<ViewDef>,
    base: Option<String>,
}

impl Table {
    /// Starts the definition of a table.
    pub fn builder(keyspace: impl Into<String>, name: impl Into<String>) -> TableBuilder {
        TableBuilder {
            keyspace: keyspace.into(),
            name: name.into(),
            columns: Vec::new(),
            partition_key: Vec::new(),
            clustering_key: Vec::new(),
            views: Vec::new(),
        }
    }

    /// Keyspace name.
    pub fn keyspace(&self) -> &str {
        &self.keyspace
    }

    /// Table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `keyspace.table`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.keyspace, self.name)
    }

    /// Column declarations in definition order.
    pub fn column_defs(&self) -> &[ColumnDef] {
        &self.columns
    }

    /// Partition key column names.
    pub fn partition_key(&self) -> &[String] {
        &self.partition_key
    }

    /// Clustering key columns.
    pub fn clustering_key(&self) -> &[ClusteringColumn] {
        &self.clustering_key
    }

    /// Materialized views defined on this table.
    pub fn views(&self) -> &[ViewDef] {
        &self.views
    }

    /// Names of the materialized views (`<table>_<suffix>`), in definition order.
    pub fn view_names(&self) -> Vec<String> {
        self.views
            .iter()
            .map(|view| view_name(&self.name, &view.suffix))
            .collect()
    }

    /// Base table name when this definition is a materialized view.
    pub fn base_table(&self) -> Option<&str> {
        self.base.as_deref()
    }

    /// Returns true if this definition is a materialized view.
    pub fn is_view(&self) -> bool {
        self.base.is_some()
    }

    /// Primary key column names, partition key first.
    pub fn primary_key(&self) -> Vec<&str> {
        self.partition_key
            .iter()
            .map(String::as_str)
            .chain(self.clustering_key.iter().map(|c| c.name.as_str()))
            .collect()
    }

    /// Returns true if the column is part of the primary key.
    pub fn is_primary_key(&self, column: &str) -> bool {
        self.primary_key().contains(&column)
    }

    /// Returns a handle on a column, for use in queries.
    ///
    /// # Errors
    ///
    /// Returns `UnknownColumn` if the table has no such column.
    pub fn column(&self, name: &str) -> Result<Column> {
        self.column_def(name)
            .map(|def| Column::new(&self.keyspace, &self.name, &def.name, def.cql_type.clone()))
            .ok_or_else(|| Error::UnknownColumn {
                table: self.qualified_name(),
                column: name.to_string(),
            })
    }

    /// Handles on every column, in definition order.
    pub fn columns(&self) -> Vec<Column> {
        self.columns
            .iter()
            .map(|def| Column::new(&self.keyspace, &self.name, &def.name, def.cql_type.clone()))
            .collect()
    }

    pub(crate) fn column_def(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|def| def.name == name)
    }

    /// Returns the materialized view `<table>_<suffix>` as a table.
    ///
    /// The view is keyed by the requested columns, followed by the base
    /// primary key columns it does not already contain.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTable` if no view with this suffix is defined.
    pub fn get_view(&self, suffix: &str) -> Result<Table> {
        let view = self
            .views
            .iter()
            .find(|view| view.suffix == suffix)
            .ok_or_else(|| {
                Error::InvalidTable(format!(
                    "Table {} does not have a view associated with {}.",
                    self.name, suffix
                ))
            })?;

        let key = self.view_key(view);
        let (partition, clustering) = key.split_at(1);

        Ok(Table {
            keyspace: self.keyspace.clone(),
            name: view_name(&self.name, &view.suffix),
            columns: self.columns.clone(),
            partition_key: partition.to_vec(),
            clustering_key: clustering
                .iter()
                .map(|name| ClusteringColumn {
                    name: name.clone(),
                    order: ClusteringOrder::Asc,
                })
                .collect(),
            views: Vec::new(),
            base: Some(self.name.clone()),
        })
    }

    /// Full primary key of a view: requested columns, then missing base key columns.
    fn view_key(&self, view: &ViewDef) -> Vec<String> {
        let mut key = view.key.clone();
        for column in self.primary_key() {
            if !key.iter().any(|k| k == column) {
                key.push(column.to_string());
            }
        }
        key
    }

    /// Groups column names by the search index field type of their CQL type.
    pub fn search_schema(&self) -> BTreeMap<SearchFieldType, Vec<String>> {
        let mut schema: BTreeMap<SearchFieldType, Vec<String>> = BTreeMap::new();
        for def in &self.columns {
            schema
                .entry(def.cql_type.search_field_type())
                .or_default()
                .push(def.name.clone());
        }
        schema
    }

    /// Renders `CREATE TABLE IF NOT EXISTS` for this table.
    pub fn create_statement(&self) -> String {
        let columns: Vec<String> = self
            .columns
            .iter()
            .map(|def| format!("{} {}", def.name, def.cql_type))
            .collect();

        let clustering: Vec<&str> = self.clustering_key.iter().map(|c| c.name.as_str()).collect();
        let mut stmt = format!(
            "CREATE TABLE IF NOT EXISTS {} ({}, PRIMARY KEY {})",
            self.qualified_name(),
            columns.join(", "),
            render_primary_key(&self.partition_key, &clustering)
        );

        if self
            .clustering_key
            .iter()
            .any(|c| c.order == ClusteringOrder::Desc)
        {
            let order: Vec<String> = self
                .clustering_key
                .iter()
                .map(|c| {
                    let dir = match c.order {
                        ClusteringOrder::Asc => "ASC",
                        ClusteringOrder::Desc => "DESC",
                    };
                    format!("{} {}", c.name, dir)
                })
                .collect();
            stmt.push_str(&format!(" WITH CLUSTERING ORDER BY ({})", order.join(", ")));
        }
        stmt
    }

    /// Renders `CREATE MATERIALIZED VIEW IF NOT EXISTS` for each view.
    ///
    /// Returns `(view name, statement)` pairs in definition order.
    pub fn view_statements(&self) -> Vec<(String, String)> {
        self.views
            .iter()
            .map(|view| {
                let name = view_name(&self.name, &view.suffix);
                let key = self.view_key(view);
                let not_null: Vec<String> =
                    key.iter().map(|k| format!("{} IS NOT NULL", k)).collect();
                let clustering: Vec<&str> = key[1..].iter().map(String::as_str).collect();
                let stmt = format!(
                    "CREATE MATERIALIZED VIEW IF NOT EXISTS {}.{} AS SELECT * FROM {} WHERE {} PRIMARY KEY {}",
                    self.keyspace,
                    name,
                    self.qualified_name(),
                    not_null.join(" AND "),
                    render_primary_key(&key[..1], &clustering)
                );
                (name, stmt)
            })
            .collect()
    }
}

fn view_name(table: &str, suffix: &str) -> String {
    format!("{}_{}", table, suffix)
}

fn render_primary_key(partition: &[String], clustering: &[&str]) -> String {
    let partition = if partition.len() == 1 {
        partition[0].clone()
    } else {
        format!("({})", partition.join(", "))
    };
    if clustering.is_empty() {
        format!("({})", partition)
    } else {
        format!("({}, {})", partition, clustering.join(", "))
    }
}

/// Builder for [`Table`].
#[derive(Debug, Clone)]
pub struct TableBuilder {
    keyspace: String,
    name: String,
    columns: Vec<ColumnDef>,
    partition_key: Vec<String>,
    clustering_key: Vec<ClusteringColumn>,
    views: Vec<ViewDef>,
}

impl TableBuilder {
    /// Adds a regular column.
    #[must_use]
    pub fn column(mut self, name: impl Into<String>, cql_type: CqlType) -> Self {
        self.columns.push(ColumnDef {
            name: name.into(),
            cql_type,
        });
        self
    }

    /// Adds a column that is part of the partition key.
    #[must_use]
    pub fn partition_key(mut self, name: impl Into<String>, cql_type: CqlType) -> Self {
        let name = name.into();
        self.partition_key.push(name.clone());
        self.column(name, cql_type)
    }

    /// Adds an ascending clustering column.
    #[must_use]
    pub fn clustering_key(self, name: impl Into<String>, cql_type: CqlType) -> Self {
        self.clustering_key_ordered(name, cql_type, ClusteringOrder::Asc)
    }

    /// Adds a clustering column with an explicit order.
    #[must_use]
    pub fn clustering_key_ordered(
        mut self,
        name: impl Into<String>,
        cql_type: CqlType,
        order: ClusteringOrder,
    ) -> Self {
        let name = name.into();
        self.clustering_key.push(ClusteringColumn {
            name: name.clone(),
            order,
        });
        self.column(name, cql_type)
    }

    /// Declares a materialized view `<table>_<suffix>` keyed by `key`.
    #[must_use]
    pub fn view<I, S>(mut self, suffix: impl Into<String>, key: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.views.push(ViewDef {
            suffix: suffix.into(),
            key: key.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Validates and builds the table.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTable` if:
    /// - a keyspace, table, column or view name is not a lower-case
    ///   identifier, or is a reserved CQL keyword
    /// - the table has no columns or no partition key
    /// - a column is declared twice, or a key names an unknown column
    /// - a key column has a counter or non-frozen collection type
    /// - counter columns are mixed with other non-key columns
    /// - a view is declared twice, has an empty key or names unknown columns
    /// - a view is defined on a counter table, or its key holds more than
    ///   one non-primary-key column of the base table
    pub fn build(self) -> Result<Table> {
        validate_name("keyspace", &self.keyspace)?;
        validate_name("table", &self.name)?;

        if self.columns.is_empty() {
            return Err(Error::InvalidTable(format!(
                "Table {} has no columns",
                self.name
            )));
        }

        let mut seen = HashSet::new();
        for def in &self.columns {
            validate_identifier("column", &def.name)?;
            if !seen.insert(def.name.as_str()) {
                return Err(Error::InvalidTable(format!(
                    "Column {} is declared more than once on {}",
                    def.name, self.name
                )));
            }
        }

        let table = Table {
            keyspace: self.keyspace,
            name: self.name,
            columns: self.columns,
            partition_key: self.partition_key,
            clustering_key: self.clustering_key,
            views: self.views,
            base: None,
        };
        validate_keys(&table)?;
        validate_counters(&table)?;
        validate_views(&table)?;
        Ok(table)
    }
}

/// Identifiers are rendered unquoted, so the server folds them to lower
/// case; only lower-case, non-reserved names round-trip through
/// `system_schema`.
fn validate_identifier(kind: &str, name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if !valid {
        return Err(Error::InvalidTable(format!(
            "Invalid {} name '{}': must start with a lower-case letter and contain only lower-case letters, digits and underscores",
            kind, name
        )));
    }
    if RESERVED_KEYWORDS.contains(&name) {
        return Err(Error::InvalidTable(format!(
            "Invalid {} name '{}': reserved CQL keyword",
            kind, name
        )));
    }
    Ok(())
}

pub(crate) fn validate_name(kind: &str, name: &str) -> Result<()> {
    validate_identifier(kind, name)?;
    if name.len() > MAX_NAME_LEN {
        return Err(Error::InvalidTable(format!(
            "Invalid {} name '{}': longer than {} characters",
            kind, name, MAX_NAME_LEN
        )));
    }
    Ok(())
}

fn validate_keys(table: &Table) -> Result<()> {
    if table.partition_key.is_empty() {
        return Err(Error::InvalidTable(format!(
            "Table {} has no partition key",
            table.name
        )));
    }

    let mut seen = HashSet::new();
    for key in table.primary_key() {
        let def = table.column_def(key).ok_or_else(|| {
            Error::InvalidTable(format!(
                "Primary key column {} is not declared on {}",
                key, table.name
            ))
        })?;
        if !seen.insert(key) {
            return Err(Error::InvalidTable(format!(
                "Column {} appears more than once in the primary key of {}",
                key, table.name
            )));
        }
        if !def.cql_type.is_key_compatible() {
            return Err(Error::InvalidTable(format!(
                "Column {} of type {} cannot be part of a primary key",
                key, def.cql_type
            )));
        }
    }
    Ok(())
}

fn validate_counters(table: &Table) -> Result<()> {
    let regular: Vec<&ColumnDef> = table
        .columns
        .iter()
        .filter(|def| !table.is_primary_key(&def.name))
        .collect();
    let counters = regular
        .iter()
        .filter(|def| def.cql_type == CqlType::Counter)
        .count();

    if counters > 0 && counters != regular.len() {
        return Err(Error::InvalidTable(format!(
            "Table {} mixes counter and non-counter columns",
            table.name
        )));
    }
    Ok(())
}

fn validate_views(table: &Table) -> Result<()> {
    if !table.views.is_empty()
        && table
            .columns
            .iter()
            .any(|def| def.cql_type == CqlType::Counter)
    {
        return Err(Error::InvalidTable(format!(
            "Table {} has counter columns and cannot have materialized views",
            table.name
        )));
    }

    let mut suffixes = HashSet::new();
    for view in &table.views {
        validate_identifier("view", &view.suffix)?;
        validate_name("view", &view_name(&table.name, &view.suffix))?;

        if !suffixes.insert(view.suffix.as_str()) {
            return Err(Error::InvalidTable(format!(
                "View {} is declared more than once on {}",
                view.suffix, table.name
            )));
        }
        if view.key.is_empty() {
            return Err(Error::InvalidTable(format!(
                "View {} of {} has an empty key",
                view.suffix, table.name
            )));
        }

        let mut seen = HashSet::new();
        for key in &view.key {
            let def = table.column_def(key).ok_or_else(|| Error::UnknownColumn {
                table: table.qualified_name(),
                column: key.clone(),
            })?;
            if !seen.insert(key.as_str()) {
                return Err(Error::InvalidTable(format!(
                    "Column {} appears more than once in the key of view {}",
                    key, view.suffix
                )));
            }
            if !def.cql_type.is_key_compatible() {
                return Err(Error::InvalidTable(format!(
                    "Column {} of type {} cannot key view {}",
                    key, def.cql_type, view.suffix
                )));
            }
        }

        let regular: Vec<&str> = view
            .key
            .iter()
            .map(String::as_str)
            .filter(|key| !table.is_primary_key(key))
            .collect();
        if regular.len() > 1 {
            return Err(Error::InvalidTable(format!(
                "View {} of {} keys on more than one non-primary-key column: {}",
                view.suffix,
                table.name,
                regular.join(", ")
            )));
        }
    }
    Ok(())
}

/// Serializable description of a table, as found in schema files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSpec {
    /// Keyspace; falls back to the configured default keyspace.
    #[serde(default)]
    pub keyspace: Option<String>,
    /// Table name.
    pub name: String,
    /// Columns in order.
    pub columns: Vec<ColumnDef>,
    /// Partition key column names.
    pub partition_key: Vec<String>,
    /// Clustering columns.
    #[serde(default)]
    pub clustering_key: Vec<ClusteringColumn>,
    /// Materialized views.
    #[serde(default)]
    pub views: Vec<ViewDef>,
}

impl TableSpec {
    /// Validates the spec into a [`Table`].
    ///
    /// # Errors
    ///
    /// Returns an error if no keyspace is given and `default_keyspace` is
    /// `None`, or if the definition is invalid.
    pub fn into_table(self, default_keyspace: Option<&str>) -> Result<Table> {
        let keyspace = self
            .keyspace
            .or_else(|| default_keyspace.map(str::to_string))
            .ok_or_else(|| {
                Error::InvalidTable(format!("Table {} has no keyspace", self.name))
            })?;

        let builder = TableBuilder {
            keyspace,
            name: self.name,
            columns: self.columns,
            partition_key: self.partition_key,
            clustering_key: self.clustering_key,
            views: self.views,
        };
        builder.build()
    }
}

impl From<&Table> for TableSpec {
    fn from(table: &Table) -> Self {
        Self {
            keyspace: Some(table.keyspace.clone()),
            name: table.name.clone(),
            columns: table.columns.clone(),
            partition_key: table.partition_key.clone(),
            clustering_key: table.clustering_key.clone(),
            views: table.views.clone(),
        }
    }
}

/// A schema file: a list of table specs in TOML or JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaFile {
    /// Table definitions.
    #[serde(default)]
    pub tables: Vec<TableSpec>,
}

impl SchemaFile {
    /// Loads a schema file; `.json` files are parsed as JSON, anything else as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(toml::from_str(&content)?)
        }
    }

    /// Validates every table spec.
    ///
    /// # Errors
    ///
    /// Returns the first invalid table's error, or `InvalidTable` if two
    /// specs define the same `keyspace.table`.
    pub fn into_tables(self, default_keyspace: Option<&str>) -> Result<Vec<Table>> {
        let mut names = HashSet::new();
        let mut tables = Vec::with_capacity(self.tables.len());
        for spec in self.tables {
            let table = spec.into_table(default_keyspace)?;
            if !names.insert(table.qualified_name()) {
                return Err(Error::InvalidTable(format!(
                    "Table {} is defined more than once",
                    table.qualified_name()
                )));
            }
            tables.push(table);
        }
        Ok(tables)
    }
}
