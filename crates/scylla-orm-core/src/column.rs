// Rust guideline compliant 2026-02-06

//! Column handles, predicates and aggregate expressions.
//!
//! A [`Column`] is obtained from a [`crate::Table`] and remembers which
//! keyspace and table it belongs to, so query builders can reject
//! expressions coming from another table.

use crate::{CqlType, CqlValue, Error, Result};
use std::fmt;

/// Comparison operator of a `WHERE` predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `=`
    Eq,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `IN`
    In,
    /// `CONTAINS`
    Contains,
    /// `CONTAINS KEY`
    ContainsKey,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            Operator::Eq => "=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::In => "IN",
            Operator::Contains => "CONTAINS",
            Operator::ContainsKey => "CONTAINS KEY",
        };
        f.write_str(op)
    }
}

/// Aggregate function applied to a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    /// `COUNT`
    Count,
    /// `MIN`
    Min,
    /// `MAX`
    Max,
    /// `SUM`
    Sum,
    /// `AVG`
    Avg,
}

impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Aggregate::Count => "COUNT",
            Aggregate::Min => "MIN",
            Aggregate::Max => "MAX",
            Aggregate::Sum => "SUM",
            Aggregate::Avg => "AVG",
        };
        f.write_str(name)
    }
}

/// A column of a specific table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Column {
    keyspace: String,
    table: String,
    name: String,
    cql_type: CqlType,
    alias: Option<String>,
}

impl Column {
    pub(crate) fn new(keyspace: &str, table: &str, name: &str, cql_type: CqlType) -> Self {
        Self {
            keyspace: keyspace.to_string(),
            table: table.to_string(),
            name: name.to_string(),
            cql_type,
            alias: None,
        }
    }

    /// Keyspace of the owning table.
    pub fn keyspace(&self) -> &str {
        &self.keyspace
    }

    /// Name of the owning table.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared CQL type.
    pub fn cql_type(&self) -> &CqlType {
        &self.cql_type
    }

    /// Alias used when the column is selected, if any.
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// `keyspace.table` of the owning table.
    pub fn qualified_table(&self) -> String {
        format!("{}.{}", self.keyspace, self.table)
    }

    /// Returns the column renamed in the selection (`name AS alias`).
    #[must_use]
    pub fn as_(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// `column = value`
    pub fn eq(&self, value: impl Into<CqlValue>) -> ColumnExpr {
        self.expr(Operator::Eq, value.into())
    }

    /// `column < value`
    pub fn lt(&self, value: impl Into<CqlValue>) -> ColumnExpr {
        self.expr(Operator::Lt, value.into())
    }

    /// `column <= value`
    pub fn le(&self, value: impl Into<CqlValue>) -> ColumnExpr {
        self.expr(Operator::Le, value.into())
    }

    /// `column > value`
    pub fn gt(&self, value: impl Into<CqlValue>) -> ColumnExpr {
        self.expr(Operator::Gt, value.into())
    }

    /// `column >= value`
    pub fn ge(&self, value: impl Into<CqlValue>) -> ColumnExpr {
        self.expr(Operator::Ge, value.into())
    }

    /// `column IN ?`, bound as a single list parameter.
    pub fn in_<I, V>(&self, values: I) -> ColumnExpr
    where
        I: IntoIterator<Item = V>,
        V: Into<CqlValue>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.expr(Operator::In, CqlValue::List(values))
    }

    /// `column CONTAINS value` for collection columns.
    pub fn contains(&self, value: impl Into<CqlValue>) -> ColumnExpr {
        self.expr(Operator::Contains, value.into())
    }

    /// `column CONTAINS KEY value` for map columns.
    pub fn contains_key(&self, value: impl Into<CqlValue>) -> ColumnExpr {
        self.expr(Operator::ContainsKey, value.into())
    }

    /// `COUNT(column)`
    pub fn count(&self) -> AggregateExpr {
        self.aggregate(Aggregate::Count)
    }

    /// `MIN(column)`
    pub fn min(&self) -> AggregateExpr {
        self.aggregate(Aggregate::Min)
    }

    /// `MAX(column)`
    pub fn max(&self) -> AggregateExpr {
        self.aggregate(Aggregate::Max)
    }

    /// `SUM(column)`
    pub fn sum(&self) -> AggregateExpr {
        self.aggregate(Aggregate::Sum)
    }

    /// `AVG(column)`
    pub fn avg(&self) -> AggregateExpr {
        self.aggregate(Aggregate::Avg)
    }

    /// Checks that a value can be bound to this column.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` if the column type does not accept the value.
    pub fn check_value(&self, value: &CqlValue) -> Result<()> {
        check_against(&self.name, &self.cql_type, value)
    }

    fn expr(&self, operator: Operator, value: CqlValue) -> ColumnExpr {
        ColumnExpr {
            column: self.clone(),
            operator,
            value,
        }
    }

    fn aggregate(&self, function: Aggregate) -> AggregateExpr {
        AggregateExpr {
            column: self.clone(),
            function,
            alias: None,
        }
    }
}

fn check_against(column: &str, cql_type: &CqlType, value: &CqlValue) -> Result<()> {
    if cql_type.accepts(value) {
        Ok(())
    } else {
        Err(Error::TypeMismatch {
            column: column.to_string(),
            expected: cql_type.to_string(),
            found: value.kind().to_string(),
        })
    }
}

/// A `WHERE` predicate on a column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnExpr {
    column: Column,
    operator: Operator,
    value: CqlValue,
}

impl ColumnExpr {
    /// Column the predicate applies to.
    pub fn column(&self) -> &Column {
        &self.column
    }

    /// Comparison operator.
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Bound value.
    pub fn value(&self) -> &CqlValue {
        &self.value
    }

    /// Renders the predicate with a bind marker, e.g. `age >= ?`.
    pub fn render(&self) -> String {
        format!("{} {} ?", self.column.name, self.operator)
    }

    /// Checks the bound value against the column type.
    ///
    /// `IN` checks each element, `CONTAINS` checks against the collection
    /// element type and `CONTAINS KEY` against the map key type.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` on an incompatible value and `InvalidQuery`
    /// when `CONTAINS`/`CONTAINS KEY` target a non-collection column.
    pub fn check_type(&self) -> Result<()> {
        let name = self.column.name();
        let ty = match self.column.cql_type() {
            CqlType::Frozen(inner) => inner.as_ref(),
            other => other,
        };

        match self.operator {
            Operator::In => match &self.value {
                CqlValue::List(items) => items
                    .iter()
                    .try_for_each(|item| check_against(name, self.column.cql_type(), item)),
                other => check_against(name, self.column.cql_type(), other),
            },
            Operator::Contains => match ty {
                CqlType::List(elem) | CqlType::Set(elem) => check_against(name, elem, &self.value),
                CqlType::Map(_, val) => check_against(name, val, &self.value),
                _ => Err(Error::InvalidQuery(format!(
                    "CONTAINS requires a collection column, {} is {}",
                    name,
                    self.column.cql_type()
                ))),
            },
            Operator::ContainsKey => match ty {
                CqlType::Map(key, _) => check_against(name, key, &self.value),
                _ => Err(Error::InvalidQuery(format!(
                    "CONTAINS KEY requires a map column, {} is {}",
                    name,
                    self.column.cql_type()
                ))),
            },
            _ => check_against(name, self.column.cql_type(), &self.value),
        }
    }
}

/// An aggregate over a column, e.g. `COUNT(id) AS total`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateExpr {
    column: Column,
    function: Aggregate,
    alias: Option<String>,
}

impl AggregateExpr {
    /// Column being aggregated.
    pub fn column(&self) -> &Column {
        &self.column
    }

    /// Aggregate function.
    pub fn function(&self) -> Aggregate {
        self.function
    }

    /// Returns the aggregate renamed in the selection.
    #[must_use]
    pub fn as_(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

/// One entry of a `SELECT` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Plain column.
    Column(Column),
    /// Aggregate over a column.
    Aggregate(AggregateExpr),
}

impl Selector {
    /// Column the selector reads.
    pub fn column(&self) -> &Column {
        match self {
            Selector::Column(column) => column,
            Selector::Aggregate(agg) => &agg.column,
        }
    }

    /// Renders the selector, e.g. `name AS n` or `MAX(score)`.
    pub fn render(&self) -> String {
        let (expr, alias) = match self {
            Selector::Column(column) => (column.name.clone(), column.alias.as_deref()),
            Selector::Aggregate(agg) => (
                format!("{}({})", agg.function, agg.column.name),
                agg.alias.as_deref(),
            ),
        };
        match alias {
            Some(alias) => format!("{} AS {}", expr, alias),
            None => expr,
        }
    }
}

impl From<Column> for Selector {
    fn from(column: Column) -> Self {
        Selector::Column(column)
    }
}

impl From<&Column> for Selector {
    fn from(column: &Column) -> Self {
        Selector::Column(column.clone())
    }
}

impl From<AggregateExpr> for Selector {
    fn from(agg: AggregateExpr) -> Self {
        Selector::Aggregate(agg)
    }
}
