// Rust guideline compliant 2026-02-06

//! Query builders for SELECT, UPDATE, DELETE and INSERT.
//!
//! Builders render parameterised CQL: every value is bound through a `?`
//! marker and returned alongside the statement in a [`BuiltQuery`].

use crate::{
    Column, ColumnExpr, CqlType, CqlValue, Error, QueryResult, Result, Row, Selector, Session,
    Table,
};
use async_trait::async_trait;
use tracing::{debug, warn};

/// A rendered statement with its positional bind values.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    /// CQL text.
    pub cql: String,
    /// Values for the `?` markers, in order.
    pub params: Vec<CqlValue>,
}

/// Common behavior of all query builders.
#[async_trait]
pub trait Query: Send + Sync {
    /// Renders the statement and its bind values.
    ///
    /// # Errors
    ///
    /// Returns `InvalidQuery` if the builder is incomplete.
    fn build_query(&self) -> Result<BuiltQuery>;

    /// Renders only the CQL text.
    ///
    /// # Errors
    ///
    /// Same as [`Query::build_query`].
    fn cql(&self) -> Result<String> {
        Ok(self.build_query()?.cql)
    }

    /// Builds the statement and runs it on a session.
    ///
    /// # Errors
    ///
    /// Returns build errors, or the session's error if execution fails.
    async fn execute(&self, session: &dyn Session) -> Result<QueryResult> {
        let built = self.build_query()?;
        debug!(cql = %built.cql, params = built.params.len(), "executing query");
        session.execute(&built.cql, &built.params).await
    }
}

/// Keyspace and table a builder is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Target {
    keyspace: String,
    table: String,
}

impl Target {
    fn of(table: &Table) -> Self {
        Self {
            keyspace: table.keyspace().to_string(),
            table: table.name().to_string(),
        }
    }

    fn of_column(column: &Column) -> Self {
        Self {
            keyspace: column.keyspace().to_string(),
            table: column.table().to_string(),
        }
    }

    fn qualified(&self) -> String {
        format!("{}.{}", self.keyspace, self.table)
    }

    fn ensure(&self, column: &Column) -> Result<()> {
        if column.keyspace() == self.keyspace && column.table() == self.table {
            Ok(())
        } else {
            Err(Error::TableMismatch {
                expected: self.qualified(),
                found: column.qualified_table(),
            })
        }
    }

    /// Checks membership and value types of predicates.
    fn check_predicates(&self, predicates: &[ColumnExpr], clause: &str) -> Result<()> {
        if predicates.is_empty() {
            return Err(Error::InvalidQuery(format!("{} condition cannot be empty!", clause)));
        }
        for predicate in predicates {
            self.ensure(predicate.column())?;
            predicate.check_type()?;
        }
        Ok(())
    }

    /// Rejects writes to materialized views.
    fn writable(table: &Table, statement: &str) -> Result<Self> {
        if let Some(base) = table.base_table() {
            return Err(Error::InvalidQuery(format!(
                "{} is a materialized view of {}; {} must target the base table",
                table.qualified_name(),
                base,
                statement
            )));
        }
        Ok(Self::of(table))
    }
}

fn render_where(cql: &mut String, predicates: &[ColumnExpr], params: &mut Vec<CqlValue>) {
    if predicates.is_empty() {
        return;
    }
    let rendered: Vec<String> = predicates.iter().map(ColumnExpr::render).collect();
    params.extend(predicates.iter().map(|p| p.value().clone()));
    cql.push_str(" WHERE ");
    cql.push_str(&rendered.join(" AND "));
}

/// `SELECT` query.
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    target: Target,
    selectors: Vec<Selector>,
    predicates: Vec<ColumnExpr>,
    group_by: Vec<Column>,
    limit: Option<u32>,
    distinct: bool,
    allow_filtering: bool,
}

impl Select {
    /// Selects every column (`SELECT *`) of a table or view.
    pub fn all(table: &Table) -> Self {
        Self::with_target(Target::of(table), Vec::new())
    }

    /// Selects columns and aggregates, all from the same table.
    ///
    /// # Errors
    ///
    /// Returns `InvalidQuery` if no selector is given, or `TableMismatch`
    /// if the selectors come from different tables.
    pub fn columns<I, S>(selectors: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<Selector>,
    {
        let selectors: Vec<Selector> = selectors.into_iter().map(Into::into).collect();
        let first = selectors.first().ok_or_else(|| {
            Error::InvalidQuery("Select expression cannot be empty!".to_string())
        })?;

        let target = Target::of_column(first.column());
        for selector in &selectors {
            target.ensure(selector.column())?;
        }
        Ok(Self::with_target(target, selectors))
    }

    fn with_target(target: Target, selectors: Vec<Selector>) -> Self {
        Self {
            target,
            selectors,
            predicates: Vec::new(),
            group_by: Vec::new(),
            limit: None,
            distinct: false,
            allow_filtering: false,
        }
    }

    /// Adds `AND`-joined `WHERE` predicates.
    ///
    /// # Errors
    ///
    /// Returns an error if no predicate is given, a predicate belongs to
    /// another table, or a value does not fit its column.
    pub fn filter<I>(mut self, predicates: I) -> Result<Self>
    where
        I: IntoIterator<Item = ColumnExpr>,
    {
        let predicates: Vec<ColumnExpr> = predicates.into_iter().collect();
        self.target.check_predicates(&predicates, "where")?;
        self.predicates.extend(predicates);
        Ok(self)
    }

    /// Sets the `GROUP BY` columns.
    ///
    /// # Errors
    ///
    /// Returns an error if no column is given or a column belongs to
    /// another table.
    pub fn group_by<I>(mut self, columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = Column>,
    {
        let columns: Vec<Column> = columns.into_iter().collect();
        if columns.is_empty() {
            return Err(Error::InvalidQuery(
                "group_by condition cannot be empty!".to_string(),
            ));
        }
        for column in &columns {
            self.target.ensure(column)?;
        }
        self.group_by = columns;
        Ok(self)
    }

    /// Limits the number of returned rows.
    ///
    /// # Errors
    ///
    /// Returns `InvalidQuery` if `limit` is zero.
    pub fn limit(mut self, limit: u32) -> Result<Self> {
        if limit == 0 {
            return Err(Error::InvalidQuery(
                "Limit cannot be null nor negative".to_string(),
            ));
        }
        self.limit = Some(limit);
        Ok(self)
    }

    /// Adds `DISTINCT`.
    #[must_use]
    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Adds `ALLOW FILTERING`.
    #[must_use]
    pub fn allow_filtering(mut self) -> Self {
        warn!(
            table = %self.target.qualified(),
            "Allow filtering usually leads to degraded performance. Consider reviewing your query."
        );
        self.allow_filtering = true;
        self
    }
}

impl Query for Select {
    fn build_query(&self) -> Result<BuiltQuery> {
        let selection = if self.selectors.is_empty() {
            "*".to_string()
        } else {
            self.selectors
                .iter()
                .map(Selector::render)
                .collect::<Vec<_>>()
                .join(", ")
        };

        let mut cql = format!(
            "SELECT {}{} FROM {}",
            if self.distinct { "DISTINCT " } else { "" },
            selection,
            self.target.qualified()
        );
        let mut params = Vec::new();
        render_where(&mut cql, &self.predicates, &mut params);

        if !self.group_by.is_empty() {
            let names: Vec<&str> = self.group_by.iter().map(Column::name).collect();
            cql.push_str(&format!(" GROUP BY {}", names.join(", ")));
        }
        if let Some(limit) = self.limit {
            cql.push_str(&format!(" LIMIT {}", limit));
        }
        if self.allow_filtering {
            cql.push_str(" ALLOW FILTERING");
        }
        Ok(BuiltQuery { cql, params })
    }
}

/// Assignment in an `UPDATE ... SET` clause.
#[derive(Debug, Clone, PartialEq)]
enum Assignment {
    Set(Column, CqlValue),
    Increment(Column, i64),
}

impl Assignment {
    fn column(&self) -> &Column {
        match self {
            Assignment::Set(column, _) | Assignment::Increment(column, _) => column,
        }
    }

    fn render(&self) -> (String, CqlValue) {
        match self {
            Assignment::Set(column, value) => (format!("{} = ?", column.name()), value.clone()),
            Assignment::Increment(column, by) => (
                format!("{0} = {0} + ?", column.name()),
                CqlValue::BigInt(*by),
            ),
        }
    }
}

/// `UPDATE` query.
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    target: Target,
    primary_key: Vec<String>,
    assignments: Vec<Assignment>,
    predicates: Vec<ColumnExpr>,
    if_exists: bool,
}

impl Update {
    /// Starts an update of a table.
    ///
    /// # Errors
    ///
    /// Returns `InvalidQuery` if the table is a materialized view.
    pub fn table(table: &Table) -> Result<Self> {
        Ok(Self {
            target: Target::writable(table, "UPDATE")?,
            primary_key: table.primary_key().iter().map(|k| k.to_string()).collect(),
            assignments: Vec::new(),
            predicates: Vec::new(),
            if_exists: false,
        })
    }

    /// Sets a column to a value; setting the same column again replaces it.
    ///
    /// # Errors
    ///
    /// Returns an error if the column belongs to another table, is part of
    /// the primary key, is a counter, or does not accept the value.
    pub fn set(mut self, column: &Column, value: impl Into<CqlValue>) -> Result<Self> {
        self.check_assignable(column)?;
        if *column.cql_type() == CqlType::Counter {
            return Err(Error::InvalidQuery(format!(
                "Counter column {} can only be incremented",
                column.name()
            )));
        }
        let value = value.into();
        column.check_value(&value)?;
        self.assign(Assignment::Set(column.clone(), value));
        Ok(self)
    }

    /// Adds `by` to a counter column (`c = c + ?`).
    ///
    /// # Errors
    ///
    /// Returns an error if the column belongs to another table or is not a
    /// counter.
    pub fn increment(mut self, column: &Column, by: i64) -> Result<Self> {
        self.check_assignable(column)?;
        if *column.cql_type() != CqlType::Counter {
            return Err(Error::InvalidQuery(format!(
                "Column {} is not a counter",
                column.name()
            )));
        }
        self.assign(Assignment::Increment(column.clone(), by));
        Ok(self)
    }

    fn check_assignable(&self, column: &Column) -> Result<()> {
        self.target.ensure(column)?;
        if self.primary_key.iter().any(|k| k == column.name()) {
            return Err(Error::InvalidQuery(format!(
                "Primary key column {} cannot be updated",
                column.name()
            )));
        }
        Ok(())
    }

    fn assign(&mut self, assignment: Assignment) {
        let name = assignment.column().name().to_string();
        match self
            .assignments
            .iter_mut()
            .find(|existing| existing.column().name() == name)
        {
            Some(existing) => *existing = assignment,
            None => self.assignments.push(assignment),
        }
    }

    /// Adds `AND`-joined `WHERE` predicates.
    ///
    /// # Errors
    ///
    /// Same as [`Select::filter`].
    pub fn filter<I>(mut self, predicates: I) -> Result<Self>
    where
        I: IntoIterator<Item = ColumnExpr>,
    {
        let predicates: Vec<ColumnExpr> = predicates.into_iter().collect();
        self.target.check_predicates(&predicates, "where")?;
        self.predicates.extend(predicates);
        Ok(self)
    }

    /// Adds `IF EXISTS`.
    #[must_use]
    pub fn if_exists(mut self) -> Self {
        self.if_exists = true;
        self
    }
}

impl Query for Update {
    fn build_query(&self) -> Result<BuiltQuery> {
        if self.assignments.is_empty() {
            return Err(Error::InvalidQuery("No SET in update query!".to_string()));
        }
        if self.predicates.is_empty() {
            return Err(Error::InvalidQuery(
                "UPDATE requires a WHERE clause".to_string(),
            ));
        }

        let mut params = Vec::new();
        let mut sets = Vec::with_capacity(self.assignments.len());
        for assignment in &self.assignments {
            let (rendered, value) = assignment.render();
            sets.push(rendered);
            params.push(value);
        }

        let mut cql = format!("UPDATE {} SET {}", self.target.qualified(), sets.join(", "));
        render_where(&mut cql, &self.predicates, &mut params);
        if self.if_exists {
            cql.push_str(" IF EXISTS");
        }
        Ok(BuiltQuery { cql, params })
    }
}

/// `DELETE` query.
#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    target: Target,
    predicates: Vec<ColumnExpr>,
    if_exists: bool,
}

impl Delete {
    /// Starts a delete from a table.
    ///
    /// # Errors
    ///
    /// Returns `InvalidQuery` if the table is a materialized view.
    pub fn table(table: &Table) -> Result<Self> {
        Ok(Self {
            target: Target::writable(table, "DELETE")?,
            predicates: Vec::new(),
            if_exists: false,
        })
    }

    /// Adds `AND`-joined `WHERE` predicates.
    ///
    /// # Errors
    ///
    /// Same as [`Select::filter`].
    pub fn filter<I>(mut self, predicates: I) -> Result<Self>
    where
        I: IntoIterator<Item = ColumnExpr>,
    {
        let predicates: Vec<ColumnExpr> = predicates.into_iter().collect();
        self.target.check_predicates(&predicates, "where")?;
        self.predicates.extend(predicates);
        Ok(self)
    }

    /// Adds `IF EXISTS`.
    #[must_use]
    pub fn if_exists(mut self) -> Self {
        self.if_exists = true;
        self
    }
}

impl Query for Delete {
    fn build_query(&self) -> Result<BuiltQuery> {
        if self.predicates.is_empty() {
            return Err(Error::InvalidQuery(
                "DELETE requires a WHERE clause".to_string(),
            ));
        }
        let mut cql = format!("DELETE FROM {}", self.target.qualified());
        let mut params = Vec::new();
        render_where(&mut cql, &self.predicates, &mut params);
        if self.if_exists {
            cql.push_str(" IF EXISTS");
        }
        Ok(BuiltQuery { cql, params })
    }
}

/// `INSERT` query; several rows are sent as one batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    table: Table,
    rows: Vec<Row>,
    if_not_exists: bool,
    ttl: Option<u32>,
}

impl Insert {
    /// Starts an insert into a table.
    ///
    /// # Errors
    ///
    /// Returns `InvalidQuery` if the table is a materialized view or a
    /// counter table.
    pub fn table(table: &Table) -> Result<Self> {
        Target::writable(table, "INSERT")?;
        if table
            .column_defs()
            .iter()
            .any(|def| def.cql_type == CqlType::Counter)
        {
            return Err(Error::InvalidQuery(format!(
                "{} is a counter table; use UPDATE with increment",
                table.qualified_name()
            )));
        }
        Ok(Self {
            table: table.clone(),
            rows: Vec::new(),
            if_not_exists: false,
            ttl: None,
        })
    }

    /// Adds rows keyed by column name.
    ///
    /// # Errors
    ///
    /// Returns an error if a row names an unknown column, misses a primary
    /// key column (or binds it to null), or holds a value of the wrong type.
    pub fn values<I>(mut self, rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = Row>,
    {
        for row in rows {
            self.check_row(&row)?;
            self.rows.push(row);
        }
        Ok(self)
    }

    fn check_row(&self, row: &Row) -> Result<()> {
        for (name, value) in row {
            self.table.column(name)?.check_value(value)?;
        }
        for key in self.table.primary_key() {
            match row.get(key) {
                Some(value) if !value.is_null() => {}
                _ => {
                    return Err(Error::InvalidQuery(format!(
                        "Row for {} is missing primary key column {}",
                        self.table.qualified_name(),
                        key
                    )))
                }
            }
        }
        Ok(())
    }

    /// Adds `IF NOT EXISTS`.
    #[must_use]
    pub fn if_not_exists(mut self) -> Self {
        self.if_not_exists = true;
        self
    }

    /// Expires the inserted rows after `seconds`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidQuery` if `seconds` is zero.
    pub fn ttl(mut self, seconds: u32) -> Result<Self> {
        if seconds == 0 {
            return Err(Error::InvalidQuery("TTL must be positive".to_string()));
        }
        self.ttl = Some(seconds);
        Ok(self)
    }

    fn render_row(&self, row: &Row, params: &mut Vec<CqlValue>) -> String {
        let mut names = Vec::with_capacity(row.len());
        for def in self.table.column_defs() {
            if let Some(value) = row.get(&def.name) {
                names.push(def.name.as_str());
                params.push(value.clone());
            }
        }
        let markers = vec!["?"; names.len()];

        let mut cql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table.qualified_name(),
            names.join(", "),
            markers.join(", ")
        );
        if self.if_not_exists {
            cql.push_str(" IF NOT EXISTS");
        }
        if let Some(ttl) = self.ttl {
            cql.push_str(&format!(" USING TTL {}", ttl));
        }
        cql
    }
}

impl Query for Insert {
    fn build_query(&self) -> Result<BuiltQuery> {
        let mut params = Vec::new();
        let statements: Vec<String> = self
            .rows
            .iter()
            .map(|row| self.render_row(row, &mut params))
            .collect();

        let cql = match statements.as_slice() {
            [] => {
                return Err(Error::InvalidQuery(
                    "INSERT requires at least one row".to_string(),
                ))
            }
            [single] => single.clone(),
            many => format!("BEGIN BATCH {}; APPLY BATCH", many.join("; ")),
        };
        Ok(BuiltQuery { cql, params })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn players() -> Table {
        Table::builder("app", "players")
            .partition_key("id", CqlType::Int)
            .column("name", CqlType::Text)
            .column("score", CqlType::Int)
            .build()
            .unwrap()
    }

    #[test]
    fn test_select_star() {
        let cql = Select::all(&players()).cql().unwrap();
        assert_eq!(cql, "SELECT * FROM app.players");
    }

    #[test]
    fn test_select_distinct_has_single_spaces() {
        let table = players();
        let cql = Select::columns([table.column("id").unwrap()])
            .unwrap()
            .distinct()
            .cql()
            .unwrap();
        assert_eq!(cql, "SELECT DISTINCT id FROM app.players");
    }

    #[test]
    fn test_select_empty_is_error() {
        let result = Select::columns(Vec::<Selector>::new());
        assert!(matches!(result, Err(Error::InvalidQuery(_))));
    }

    #[test]
    fn test_update_params_order() {
        let table = players();
        let built = Update::table(&table)
            .unwrap()
            .set(&table.column("score").unwrap(), 10)
            .unwrap()
            .filter([table.column("id").unwrap().eq(1)])
            .unwrap()
            .build_query()
            .unwrap();
        assert_eq!(built.cql, "UPDATE app.players SET score = ? WHERE id = ?");
        assert_eq!(built.params, vec![CqlValue::Int(10), CqlValue::Int(1)]);
    }

    #[test]
    fn test_insert_requires_rows() {
        let insert = Insert::table(&players()).unwrap();
        assert!(insert.build_query().is_err());
    }
}
