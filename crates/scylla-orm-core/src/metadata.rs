// Rust guideline compliant 2026-02-06

//! Registry of tables and creation of all keyspaces, tables and views.
//!
//! DDL is ordered through a dependency graph: a keyspace precedes its
//! tables and a table precedes its materialized views. The plan lists every
//! keyspace, then every table, then every view; objects at the same depth
//! keep their registration order.

use crate::{Config, CqlValue, Error, Result, Session, Table};
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

/// Kind of schema object created by [`MetaData`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    /// `CREATE KEYSPACE`
    Keyspace,
    /// `CREATE TABLE`
    Table,
    /// `CREATE MATERIALIZED VIEW`
    View,
}

/// One DDL statement of a creation plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaObject {
    /// Object kind.
    pub kind: ObjectKind,
    /// Keyspace the object lives in (the keyspace itself for keyspaces).
    pub keyspace: String,
    /// Object name (the keyspace name for keyspaces).
    pub name: String,
    /// DDL statement creating the object.
    pub statement: String,
}

impl SchemaObject {
    /// `keyspace` for keyspaces, `keyspace.name` otherwise.
    pub fn qualified_name(&self) -> String {
        match self.kind {
            ObjectKind::Keyspace => self.keyspace.clone(),
            ObjectKind::Table | ObjectKind::View => format!("{}.{}", self.keyspace, self.name),
        }
    }
}

/// Outcome of [`MetaData::create_all`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreateReport {
    /// Objects that were created, in creation order.
    pub created: Vec<String>,
    /// Objects that already existed.
    pub skipped: Vec<String>,
}

/// Registry of table definitions.
#[derive(Debug, Clone, Default)]
pub struct MetaData {
    tables: Vec<Table>,
}

impl MetaData {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry from several tables.
    ///
    /// # Errors
    ///
    /// Returns an error if a table is registered twice.
    pub fn with_tables<I>(tables: I) -> Result<Self>
    where
        I: IntoIterator<Item = Table>,
    {
        let mut metadata = Self::new();
        for table in tables {
            metadata.register(table)?;
        }
        Ok(metadata)
    }

    /// Registers a table and its views.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTable` if the table is a view or is already registered.
    pub fn register(&mut self, table: Table) -> Result<()> {
        if let Some(base) = table.base_table() {
            return Err(Error::InvalidTable(format!(
                "{} is a view of {}; register the base table instead",
                table.qualified_name(),
                base
            )));
        }
        if self.get(table.keyspace(), table.name()).is_some() {
            return Err(Error::InvalidTable(format!(
                "Table {} is already registered",
                table.qualified_name()
            )));
        }
        self.tables.push(table);
        Ok(())
    }

    /// Registered tables in registration order.
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// Looks up a table by keyspace and name.
    pub fn get(&self, keyspace: &str, name: &str) -> Option<&Table> {
        self.tables
            .iter()
            .find(|t| t.keyspace() == keyspace && t.name() == name)
    }

    /// Looks up a table by `keyspace.table`.
    pub fn get_qualified(&self, qualified: &str) -> Option<&Table> {
        let (keyspace, name) = qualified.split_once('.')?;
        self.get(keyspace, name)
    }

    /// Keyspaces in order of first appearance.
    pub fn keyspaces(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.tables
            .iter()
            .filter(|t| seen.insert(t.keyspace()))
            .map(|t| t.keyspace().to_string())
            .collect()
    }

    /// Orders every DDL statement so dependencies are created first.
    ///
    /// Keyspace statements use the active environment's settings and are
    /// only included when `config.create_keyspaces` is set.
    pub fn plan(&self, config: &Config) -> Vec<SchemaObject> {
        let env = config.active_environment();
        let mut graph: DiGraph<SchemaObject, ()> = DiGraph::new();
        let mut keyspace_nodes: HashMap<String, NodeIndex> = HashMap::new();

        for table in &self.tables {
            let keyspace_node = if config.create_keyspaces {
                let node = *keyspace_nodes
                    .entry(table.keyspace().to_string())
                    .or_insert_with(|| {
                        graph.add_node(SchemaObject {
                            kind: ObjectKind::Keyspace,
                            keyspace: table.keyspace().to_string(),
                            name: table.keyspace().to_string(),
                            statement: env.create_keyspace_statement(table.keyspace()),
                        })
                    });
                Some(node)
            } else {
                None
            };

            let table_node = graph.add_node(SchemaObject {
                kind: ObjectKind::Table,
                keyspace: table.keyspace().to_string(),
                name: table.name().to_string(),
                statement: table.create_statement(),
            });
            if let Some(keyspace_node) = keyspace_node {
                graph.add_edge(keyspace_node, table_node, ());
            }

            for (name, statement) in table.view_statements() {
                let view_node = graph.add_node(SchemaObject {
                    kind: ObjectKind::View,
                    keyspace: table.keyspace().to_string(),
                    name,
                    statement,
                });
                graph.add_edge(table_node, view_node, ());
            }
        }

        depth_order(&graph)
            .into_iter()
            .map(|idx| graph[idx].clone())
            .collect()
    }

    /// Creates every missing keyspace, table and view.
    ///
    /// Existing objects are read from `system_schema` first; only missing
    /// objects are created, in [`MetaData::plan`] order.
    ///
    /// # Errors
    ///
    /// Returns the session's error if a lookup or a DDL statement fails.
    /// Objects created before the failure stay created.
    pub async fn create_all(&self, session: &dyn Session, config: &Config) -> Result<CreateReport> {
        let mut existing: HashSet<(ObjectKind, String)> = HashSet::new();
        for keyspace in self.keyspaces() {
            let found = lookup_existing(session, &keyspace).await?;
            existing.extend(found);
        }

        let mut report = CreateReport::default();
        for object in self.plan(config) {
            let qualified = object.qualified_name();
            if existing.contains(&(object.kind, qualified.to_ascii_lowercase())) {
                debug!(object = %qualified, "already exists");
                report.skipped.push(qualified);
                continue;
            }

            info!(kind = ?object.kind, object = %qualified, "creating");
            session.execute(&object.statement, &[]).await?;
            report.created.push(qualified);
        }

        if !config.create_keyspaces {
            for keyspace in self.keyspaces() {
                if !existing.contains(&(ObjectKind::Keyspace, keyspace.to_ascii_lowercase())) {
                    warn!(keyspace = %keyspace, "keyspace not found and keyspace creation is disabled");
                }
            }
        }

        info!(
            created = report.created.len(),
            skipped = report.skipped.len(),
            "schema creation finished"
        );
        Ok(report)
    }
}

/// Orders nodes by dependency depth, ties broken by node index.
///
/// The graph is acyclic by construction (edges only point from a keyspace
/// to its tables and from a table to its views).
fn depth_order<N, E>(graph: &DiGraph<N, E>) -> Vec<NodeIndex> {
    let sorted = match toposort(graph, None) {
        Ok(sorted) => sorted,
        Err(cycle) => {
            warn!(node = cycle.node_id().index(), "cycle in schema graph");
            return graph.node_indices().collect();
        }
    };

    let mut depth = vec![0usize; graph.node_count()];
    for &idx in &sorted {
        depth[idx.index()] = graph
            .neighbors_directed(idx, Direction::Incoming)
            .map(|parent| depth[parent.index()] + 1)
            .max()
            .unwrap_or(0);
    }

    let mut order: Vec<NodeIndex> = graph.node_indices().collect();
    order.sort_by_key(|idx| (depth[idx.index()], idx.index()));
    order
}

/// Reads the keyspace, tables and views that already exist in `keyspace`.
///
/// Names are returned lower-cased as `keyspace[.object]`.
async fn lookup_existing(
    session: &dyn Session,
    keyspace: &str,
) -> Result<Vec<(ObjectKind, String)>> {
    let keyspace = keyspace.to_ascii_lowercase();
    let param = [CqlValue::from(keyspace.as_str())];
    let mut found = Vec::new();

    let keyspaces = session
        .execute(
            "SELECT keyspace_name FROM system_schema.keyspaces WHERE keyspace_name = ?",
            &param,
        )
        .await?;
    if !keyspaces.is_empty() {
        found.push((ObjectKind::Keyspace, keyspace.clone()));
    }

    let tables = session
        .execute(
            "SELECT table_name FROM system_schema.tables WHERE keyspace_name = ?",
            &param,
        )
        .await?;
    found.extend(
        tables
            .text_column("table_name")
            .into_iter()
            .map(|name| {
                (
                    ObjectKind::Table,
                    format!("{}.{}", keyspace, name.to_ascii_lowercase()),
                )
            }),
    );

    let views = session
        .execute(
            "SELECT view_name FROM system_schema.views WHERE keyspace_name = ?",
            &param,
        )
        .await?;
    found.extend(
        views
            .text_column("view_name")
            .into_iter()
            .map(|name| {
                (
                    ObjectKind::View,
                    format!("{}.{}", keyspace, name.to_ascii_lowercase()),
                )
            }),
    );

    debug!(keyspace = %keyspace, existing = found.len(), "looked up existing schema");
    Ok(found)
}
