// Rust guideline compliant 2026-02-06

//! Values bound to CQL statements and returned in result rows.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// A result row keyed by column name (or alias).
pub type Row = BTreeMap<String, CqlValue>;

/// A value bound to a query parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CqlValue {
    /// CQL null.
    Null,
    /// Boolean.
    Boolean(bool),
    /// 8-bit integer.
    TinyInt(i8),
    /// 16-bit integer.
    SmallInt(i16),
    /// 32-bit integer.
    Int(i32),
    /// 64-bit integer.
    BigInt(i64),
    /// 32-bit float.
    Float(f32),
    /// 64-bit float.
    Double(f64),
    /// UTF-8 text.
    Text(String),
    /// Raw bytes.
    Blob(Vec<u8>),
    /// UUID (any version).
    Uuid(Uuid),
    /// UTC timestamp.
    Timestamp(DateTime<Utc>),
    /// Calendar date.
    Date(NaiveDate),
    /// List (or tuple) of values.
    List(Vec<CqlValue>),
    /// Set of values.
    Set(Vec<CqlValue>),
    /// Map as ordered key/value pairs.
    Map(Vec<(CqlValue, CqlValue)>),
}

impl CqlValue {
    /// Returns the integer value for any integer variant.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CqlValue::TinyInt(v) => Some(i64::from(*v)),
            CqlValue::SmallInt(v) => Some(i64::from(*v)),
            CqlValue::Int(v) => Some(i64::from(*v)),
            CqlValue::BigInt(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the text value, if this is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CqlValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns true for `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, CqlValue::Null)
    }

    /// Short name of the value kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            CqlValue::Null => "null",
            CqlValue::Boolean(_) => "boolean",
            CqlValue::TinyInt(_) => "tinyint",
            CqlValue::SmallInt(_) => "smallint",
            CqlValue::Int(_) => "int",
            CqlValue::BigInt(_) => "bigint",
            CqlValue::Float(_) => "float",
            CqlValue::Double(_) => "double",
            CqlValue::Text(_) => "text",
            CqlValue::Blob(_) => "blob",
            CqlValue::Uuid(_) => "uuid",
            CqlValue::Timestamp(_) => "timestamp",
            CqlValue::Date(_) => "date",
            CqlValue::List(_) => "list",
            CqlValue::Set(_) => "set",
            CqlValue::Map(_) => "map",
        }
    }
}

impl From<bool> for CqlValue {
    fn from(value: bool) -> Self {
        CqlValue::Boolean(value)
    }
}

impl From<i8> for CqlValue {
    fn from(value: i8) -> Self {
        CqlValue::TinyInt(value)
    }
}

impl From<i16> for CqlValue {
    fn from(value: i16) -> Self {
        CqlValue::SmallInt(value)
    }
}

impl From<i32> for CqlValue {
    fn from(value: i32) -> Self {
        CqlValue::Int(value)
    }
}

impl From<i64> for CqlValue {
    fn from(value: i64) -> Self {
        CqlValue::BigInt(value)
    }
}

impl From<f32> for CqlValue {
    fn from(value: f32) -> Self {
        CqlValue::Float(value)
    }
}

impl From<f64> for CqlValue {
    fn from(value: f64) -> Self {
        CqlValue::Double(value)
    }
}

impl From<&str> for CqlValue {
    fn from(value: &str) -> Self {
        CqlValue::Text(value.to_string())
    }
}

impl From<String> for CqlValue {
    fn from(value: String) -> Self {
        CqlValue::Text(value)
    }
}

impl From<Uuid> for CqlValue {
    fn from(value: Uuid) -> Self {
        CqlValue::Uuid(value)
    }
}

impl From<DateTime<Utc>> for CqlValue {
    fn from(value: DateTime<Utc>) -> Self {
        CqlValue::Timestamp(value)
    }
}

impl From<NaiveDate> for CqlValue {
    fn from(value: NaiveDate) -> Self {
        CqlValue::Date(value)
    }
}

impl<T: Into<CqlValue>> From<Vec<T>> for CqlValue {
    fn from(values: Vec<T>) -> Self {
        CqlValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<CqlValue>> From<Option<T>> for CqlValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(CqlValue::Null, Into::into)
    }
}
