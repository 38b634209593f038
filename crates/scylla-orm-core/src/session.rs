// Rust guideline compliant 2026-02-06

//! The seam between query building and the CQL driver.
//!
//! The crate never speaks the CQL wire protocol itself; anything that can
//! run a statement with bound values implements [`Session`].

use crate::{CqlValue, Error, Result, Row};
use async_trait::async_trait;
use std::sync::Mutex;

/// Rows returned by a statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    /// Result rows, empty for statements that return nothing.
    pub rows: Vec<Row>,
}

impl QueryResult {
    /// Creates a result from rows.
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if no rows were returned.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First row, if any.
    pub fn first(&self) -> Option<&Row> {
        self.rows.first()
    }

    /// Text values of one column across all rows, skipping rows without it.
    pub fn text_column(&self, column: &str) -> Vec<String> {
        self.rows
            .iter()
            .filter_map(|row| row.get(column).and_then(CqlValue::as_text))
            .map(str::to_string)
            .collect()
    }
}

/// Executes CQL statements against a cluster.
#[async_trait]
pub trait Session: Send + Sync {
    /// Executes one statement with positional bind values.
    ///
    /// # Errors
    ///
    /// Returns `Error::Session` if the statement fails.
    async fn execute(&self, cql: &str, params: &[CqlValue]) -> Result<QueryResult>;
}

/// A statement recorded by [`RecordingSession`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedStatement {
    /// CQL text.
    pub cql: String,
    /// Bound values.
    pub params: Vec<CqlValue>,
}

/// In-memory session that records statements and replays canned results.
///
/// Responses are matched by CQL prefix; the first matching registration
/// wins. Statements with no registered response return an empty result.
#[derive(Debug, Default)]
pub struct RecordingSession {
    statements: Mutex<Vec<RecordedStatement>>,
    responses: Vec<(String, QueryResult)>,
    failures: Vec<String>,
}

impl RecordingSession {
    /// Creates an empty recording session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the result returned for statements starting with `prefix`.
    #[must_use]
    pub fn respond(mut self, prefix: impl Into<String>, result: QueryResult) -> Self {
        self.responses.push((prefix.into(), result));
        self
    }

    /// Makes statements starting with `prefix` fail.
    #[must_use]
    pub fn fail_on(mut self, prefix: impl Into<String>) -> Self {
        self.failures.push(prefix.into());
        self
    }

    /// Statements executed so far, in order.
    pub fn statements(&self) -> Vec<RecordedStatement> {
        self.statements
            .lock()
            .map(|statements| statements.clone())
            .unwrap_or_default()
    }

    /// CQL text of the statements executed so far.
    pub fn executed(&self) -> Vec<String> {
        self.statements().into_iter().map(|s| s.cql).collect()
    }
}

#[async_trait]
impl Session for RecordingSession {
    async fn execute(&self, cql: &str, params: &[CqlValue]) -> Result<QueryResult> {
        if self.failures.iter().any(|prefix| cql.starts_with(prefix.as_str())) {
            return Err(Error::Session(format!("statement rejected: {}", cql)));
        }

        self.statements
            .lock()
            .map_err(|_| Error::Session("recording lock poisoned".to_string()))?
            .push(RecordedStatement {
                cql: cql.to_string(),
                params: params.to_vec(),
            });

        Ok(self
            .responses
            .iter()
            .find(|(prefix, _)| cql.starts_with(prefix.as_str()))
            .map(|(_, result)| result.clone())
            .unwrap_or_default())
    }
}
