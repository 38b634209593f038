// Rust guideline compliant 2026-02-06

//! CQL column types and their search index mapping.

use crate::{CqlValue, Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A CQL data type as declared on a column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CqlType {
    /// ASCII string.
    Ascii,
    /// 64-bit signed integer.
    BigInt,
    /// Arbitrary bytes.
    Blob,
    /// True or false.
    Boolean,
    /// Distributed counter.
    Counter,
    /// Date without time of day.
    Date,
    /// Variable-precision decimal.
    Decimal,
    /// 64-bit float.
    Double,
    /// Duration with nanosecond precision.
    Duration,
    /// 32-bit float.
    Float,
    /// IPv4 or IPv6 address.
    Inet,
    /// 32-bit signed integer.
    Int,
    /// 16-bit signed integer.
    SmallInt,
    /// UTF-8 string.
    Text,
    /// Time of day.
    Time,
    /// Millisecond timestamp.
    Timestamp,
    /// Version 1 UUID.
    TimeUuid,
    /// 8-bit signed integer.
    TinyInt,
    /// Any UUID.
    Uuid,
    /// Alias of text.
    Varchar,
    /// Arbitrary-precision integer.
    Varint,
    /// Ordered collection.
    List(Box<CqlType>),
    /// Unordered unique collection.
    Set(Box<CqlType>),
    /// Key/value collection.
    Map(Box<CqlType>, Box<CqlType>),
    /// Frozen (serialized as a single value) type.
    Frozen(Box<CqlType>),
    /// Fixed-length heterogeneous tuple.
    Tuple(Vec<CqlType>),
}

/// Field type of a full-text search index schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SearchFieldType {
    /// Tokenized full-text field.
    Text,
    /// Sortable numeric field.
    Numeric,
    /// Exact-match tag field.
    Tag,
}

impl fmt::Display for SearchFieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SearchFieldType::Text => "TEXT",
            SearchFieldType::Numeric => "NUMERIC",
            SearchFieldType::Tag => "TAG",
        };
        f.write_str(name)
    }
}

impl CqlType {
    /// Returns true for list, set and map types (frozen or not).
    pub fn is_collection(&self) -> bool {
        match self {
            CqlType::List(_) | CqlType::Set(_) | CqlType::Map(_, _) => true,
            CqlType::Frozen(inner) => inner.is_collection(),
            _ => false,
        }
    }

    /// Returns true if the type can be part of a primary key.
    ///
    /// Counters and non-frozen collections cannot.
    pub fn is_key_compatible(&self) -> bool {
        match self {
            CqlType::Counter => false,
            CqlType::List(_) | CqlType::Set(_) | CqlType::Map(_, _) => false,
            _ => true,
        }
    }

    /// Maps the type to the search index field type it is indexed as.
    pub fn search_field_type(&self) -> SearchFieldType {
        match self {
            CqlType::Ascii | CqlType::Text | CqlType::Varchar => SearchFieldType::Text,
            CqlType::BigInt
            | CqlType::Counter
            | CqlType::Date
            | CqlType::Decimal
            | CqlType::Double
            | CqlType::Duration
            | CqlType::Float
            | CqlType::Int
            | CqlType::SmallInt
            | CqlType::Time
            | CqlType::Timestamp
            | CqlType::TinyInt
            | CqlType::Varint => SearchFieldType::Numeric,
            CqlType::Frozen(inner) => inner.search_field_type(),
            _ => SearchFieldType::Tag,
        }
    }

    /// Checks whether a value can be bound to a column of this type.
    ///
    /// Null is accepted by every type. Integer values are accepted by any
    /// integer column whose range holds them.
    pub fn accepts(&self, value: &CqlValue) -> bool {
        if matches!(value, CqlValue::Null) {
            return true;
        }
        match self {
            CqlType::Frozen(inner) => inner.accepts(value),
            CqlType::Boolean => matches!(value, CqlValue::Boolean(_)),
            CqlType::TinyInt => fits(value, i8::MIN.into(), i8::MAX.into()),
            CqlType::SmallInt => fits(value, i16::MIN.into(), i16::MAX.into()),
            CqlType::Int => fits(value, i32::MIN.into(), i32::MAX.into()),
            CqlType::BigInt | CqlType::Counter => value.as_i64().is_some(),
            CqlType::Varint => value.as_i64().is_some() || is_integer_text(value),
            CqlType::Float => matches!(value, CqlValue::Float(_)),
            CqlType::Double => matches!(value, CqlValue::Float(_) | CqlValue::Double(_)),
            CqlType::Decimal => {
                matches!(value, CqlValue::Float(_) | CqlValue::Double(_))
                    || value.as_i64().is_some()
                    || is_decimal_text(value)
            }
            CqlType::Text | CqlType::Varchar => matches!(value, CqlValue::Text(_)),
            CqlType::Ascii => matches!(value, CqlValue::Text(s) if s.is_ascii()),
            CqlType::Inet => {
                matches!(value, CqlValue::Text(s) if s.parse::<std::net::IpAddr>().is_ok())
            }
            CqlType::Duration | CqlType::Time => matches!(value, CqlValue::Text(_)),
            CqlType::Blob => matches!(value, CqlValue::Blob(_)),
            CqlType::Uuid => matches!(value, CqlValue::Uuid(_)),
            CqlType::TimeUuid => matches!(value, CqlValue::Uuid(u) if u.get_version_num() == 1),
            CqlType::Timestamp => {
                matches!(value, CqlValue::Timestamp(_)) || value.as_i64().is_some()
            }
            CqlType::Date => matches!(value, CqlValue::Date(_)),
            CqlType::List(elem) => match value {
                CqlValue::List(items) => items.iter().all(|item| elem.accepts(item)),
                _ => false,
            },
            CqlType::Set(elem) => match value {
                CqlValue::Set(items) | CqlValue::List(items) => {
                    items.iter().all(|item| elem.accepts(item))
                }
                _ => false,
            },
            CqlType::Map(key, val) => match value {
                CqlValue::Map(pairs) => pairs
                    .iter()
                    .all(|(k, v)| key.accepts(k) && val.accepts(v)),
                _ => false,
            },
            CqlType::Tuple(types) => match value {
                CqlValue::List(items) => {
                    items.len() == types.len()
                        && types.iter().zip(items).all(|(t, item)| t.accepts(item))
                }
                _ => false,
            },
        }
    }
}

fn fits(value: &CqlValue, min: i64, max: i64) -> bool {
    value.as_i64().is_some_and(|v| (min..=max).contains(&v))
}

/// Optional sign followed by one or more digits.
fn is_integer_text(value: &CqlValue) -> bool {
    match value {
        CqlValue::Text(s) => is_digits(strip_sign(s)),
        _ => false,
    }
}

/// Optional sign, digits with at most one dot, at least one digit overall.
fn is_decimal_text(value: &CqlValue) -> bool {
    match value {
        CqlValue::Text(s) => {
            let unsigned = strip_sign(s);
            match unsigned.split_once('.') {
                Some((int, frac)) => {
                    (!int.is_empty() || !frac.is_empty())
                        && (int.is_empty() || is_digits(int))
                        && (frac.is_empty() || is_digits(frac))
                }
                None => is_digits(unsigned),
            }
        }
        _ => false,
    }
}

fn strip_sign(s: &str) -> &str {
    s.strip_prefix('-')
        .or_else(|| s.strip_prefix('+'))
        .unwrap_or(s)
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

impl fmt::Display for CqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CqlType::Ascii => f.write_str("ascii"),
            CqlType::BigInt => f.write_str("bigint"),
            CqlType::Blob => f.write_str("blob"),
            CqlType::Boolean => f.write_str("boolean"),
            CqlType::Counter => f.write_str("counter"),
            CqlType::Date => f.write_str("date"),
            CqlType::Decimal => f.write_str("decimal"),
            CqlType::Double => f.write_str("double"),
            CqlType::Duration => f.write_str("duration"),
            CqlType::Float => f.write_str("float"),
            CqlType::Inet => f.write_str("inet"),
            CqlType::Int => f.write_str("int"),
            CqlType::SmallInt => f.write_str("smallint"),
            CqlType::Text => f.write_str("text"),
            CqlType::Time => f.write_str("time"),
            CqlType::Timestamp => f.write_str("timestamp"),
            CqlType::TimeUuid => f.write_str("timeuuid"),
            CqlType::TinyInt => f.write_str("tinyint"),
            CqlType::Uuid => f.write_str("uuid"),
            CqlType::Varchar => f.write_str("varchar"),
            CqlType::Varint => f.write_str("varint"),
            CqlType::List(elem) => write!(f, "list<{}>", elem),
            CqlType::Set(elem) => write!(f, "set<{}>", elem),
            CqlType::Map(key, val) => write!(f, "map<{}, {}>", key, val),
            CqlType::Frozen(inner) => write!(f, "frozen<{}>", inner),
            CqlType::Tuple(types) => {
                let parts: Vec<String> = types.iter().map(ToString::to_string).collect();
                write!(f, "tuple<{}>", parts.join(", "))
            }
        }
    }
}

impl FromStr for CqlType {
    type Err = Error;

    /// Parses a CQL type, case-insensitively, with nested collection types.
    ///
    /// # Errors
    ///
    /// Returns an error if the type name is unknown, the brackets are
    /// unbalanced or a collection has the wrong number of arguments.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::InvalidType("empty type".to_string()));
        }

        let Some(open) = s.find('<') else {
            return parse_native(s);
        };
        if !s.ends_with('>') {
            return Err(Error::InvalidType(format!("unbalanced brackets in '{}'", s)));
        }

        let outer = s[..open].trim().to_ascii_lowercase();
        let args = split_top_level(&s[open + 1..s.len() - 1])?
            .into_iter()
            .map(str::parse)
            .collect::<Result<Vec<CqlType>>>()?;

        let mut args = args.into_iter();
        let ty = match (outer.as_str(), args.len()) {
            ("list", 1) => args.next().map(|t| CqlType::List(Box::new(t))),
            ("set", 1) => args.next().map(|t| CqlType::Set(Box::new(t))),
            ("frozen", 1) => args.next().map(|t| CqlType::Frozen(Box::new(t))),
            ("map", 2) => match (args.next(), args.next()) {
                (Some(k), Some(v)) => Some(CqlType::Map(Box::new(k), Box::new(v))),
                _ => None,
            },
            ("tuple", n) if n > 0 => Some(CqlType::Tuple(args.collect())),
            _ => None,
        };

        ty.ok_or_else(|| Error::InvalidType(format!("invalid collection type '{}'", s)))
    }
}

fn parse_native(s: &str) -> Result<CqlType> {
    let ty = match s.to_ascii_lowercase().as_str() {
        "ascii" => CqlType::Ascii,
        "bigint" => CqlType::BigInt,
        "blob" => CqlType::Blob,
        "boolean" => CqlType::Boolean,
        "counter" => CqlType::Counter,
        "date" => CqlType::Date,
        "decimal" => CqlType::Decimal,
        "double" => CqlType::Double,
        "duration" => CqlType::Duration,
        "float" => CqlType::Float,
        "inet" => CqlType::Inet,
        "int" => CqlType::Int,
        "smallint" => CqlType::SmallInt,
        "text" => CqlType::Text,
        "time" => CqlType::Time,
        "timestamp" => CqlType::Timestamp,
        "timeuuid" => CqlType::TimeUuid,
        "tinyint" => CqlType::TinyInt,
        "uuid" => CqlType::Uuid,
        "varchar" => CqlType::Varchar,
        "varint" => CqlType::Varint,
        _ => return Err(Error::InvalidType(format!("unknown type '{}'", s))),
    };
    Ok(ty)
}

/// Splits collection arguments on commas that are not nested in brackets.
fn split_top_level(s: &str) -> Result<Vec<&str>> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (idx, ch) in s.char_indices() {
        match ch {
            '<' => depth += 1,
            '>' => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    Error::InvalidType(format!("unbalanced brackets in '{}'", s))
                })?;
            }
            ',' if depth == 0 => {
                parts.push(s[start..idx].trim());
                start = idx + 1;
            }
            _ => {}
        }
    }

    if depth != 0 {
        return Err(Error::InvalidType(format!("unbalanced brackets in '{}'", s)));
    }
    parts.push(s[start..].trim());

    if parts.iter().any(|part| part.is_empty()) {
        return Err(Error::InvalidType(format!("empty type argument in '{}'", s)));
    }
    Ok(parts)
}

impl TryFrom<String> for CqlType {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<CqlType> for String {
    fn from(value: CqlType) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_native_case_insensitive() {
        assert_eq!("TEXT".parse::<CqlType>().unwrap(), CqlType::Text);
        assert_eq!(" BigInt ".parse::<CqlType>().unwrap(), CqlType::BigInt);
        assert_eq!("timeuuid".parse::<CqlType>().unwrap(), CqlType::TimeUuid);
    }

    #[test]
    fn test_parse_nested_collections() {
        let ty: CqlType = "map<text, frozen<list<int>>>".parse().unwrap();
        assert_eq!(
            ty,
            CqlType::Map(
                Box::new(CqlType::Text),
                Box::new(CqlType::Frozen(Box::new(CqlType::List(Box::new(CqlType::Int)))))
            )
        );
        assert_eq!(ty.to_string(), "map<text, frozen<list<int>>>");
    }

    #[test]
    fn test_parse_tuple() {
        let ty: CqlType = "tuple<int,text,uuid>".parse().unwrap();
        assert_eq!(ty.to_string(), "tuple<int, text, uuid>");
    }

    #[test]
    fn test_parse_rejects_invalid() {
        assert!("".parse::<CqlType>().is_err());
        assert!("string".parse::<CqlType>().is_err());
        assert!("list<int".parse::<CqlType>().is_err());
        assert!("list<int, text>".parse::<CqlType>().is_err());
        assert!("map<int>".parse::<CqlType>().is_err());
        assert!("map<int,>".parse::<CqlType>().is_err());
        assert!("list<int>>".parse::<CqlType>().is_err());
        assert!("tuple<>".parse::<CqlType>().is_err());
    }

    #[test]
    fn test_search_field_types() {
        assert_eq!(CqlType::Varchar.search_field_type(), SearchFieldType::Text);
        assert_eq!(CqlType::Timestamp.search_field_type(), SearchFieldType::Numeric);
        assert_eq!(CqlType::Uuid.search_field_type(), SearchFieldType::Tag);
        assert_eq!(
            CqlType::Set(Box::new(CqlType::Text)).search_field_type(),
            SearchFieldType::Tag
        );
        assert_eq!(
            CqlType::Frozen(Box::new(CqlType::Int)).search_field_type(),
            SearchFieldType::Numeric
        );
    }

    #[test]
    fn test_accepts_integer_ranges() {
        assert!(CqlType::TinyInt.accepts(&CqlValue::Int(127)));
        assert!(!CqlType::TinyInt.accepts(&CqlValue::Int(128)));
        assert!(CqlType::Int.accepts(&CqlValue::BigInt(i64::from(i32::MAX))));
        assert!(!CqlType::Int.accepts(&CqlValue::BigInt(i64::from(i32::MAX) + 1)));
        assert!(CqlType::BigInt.accepts(&CqlValue::Int(3)));
        assert!(!CqlType::Int.accepts(&CqlValue::Text("3".to_string())));
    }

    #[test]
    fn test_accepts_numeric_text() {
        let text = |s: &str| CqlValue::from(s);
        assert!(CqlType::Varint.accepts(&text("-12345678901234567890")));
        assert!(CqlType::Varint.accepts(&text("+7")));
        assert!(!CqlType::Varint.accepts(&text("1.5")));
        assert!(!CqlType::Varint.accepts(&text(".")));
        assert!(!CqlType::Varint.accepts(&text("-")));

        assert!(CqlType::Decimal.accepts(&text("1.25")));
        assert!(CqlType::Decimal.accepts(&text("-.5")));
        assert!(CqlType::Decimal.accepts(&text("3.")));
        assert!(!CqlType::Decimal.accepts(&text("1.2.3")));
        assert!(!CqlType::Decimal.accepts(&text(".")));
        assert!(!CqlType::Decimal.accepts(&text("1e5")));
    }

    #[test]
    fn test_accepts_null_and_collections() {
        let list = CqlType::List(Box::new(CqlType::Text));
        assert!(list.accepts(&CqlValue::Null));
        assert!(list.accepts(&CqlValue::List(vec![CqlValue::from("a")])));
        assert!(!list.accepts(&CqlValue::List(vec![CqlValue::Int(1)])));

        let map = CqlType::Map(Box::new(CqlType::Text), Box::new(CqlType::Int));
        assert!(map.accepts(&CqlValue::Map(vec![(CqlValue::from("a"), CqlValue::Int(1))])));
        assert!(!map.accepts(&CqlValue::Map(vec![(CqlValue::Int(1), CqlValue::Int(1))])));
    }

    #[test]
    fn test_accepts_inet_and_ascii() {
        assert!(CqlType::Inet.accepts(&CqlValue::from("10.0.0.1")));
        assert!(!CqlType::Inet.accepts(&CqlValue::from("not-an-ip")));
        assert!(CqlType::Ascii.accepts(&CqlValue::from("plain")));
        assert!(!CqlType::Ascii.accepts(&CqlValue::from("caf\u{e9}")));
    }

    #[test]
    fn test_key_compatibility() {
        assert!(CqlType::Text.is_key_compatible());
        assert!(!CqlType::Counter.is_key_compatible());
        assert!(!CqlType::List(Box::new(CqlType::Int)).is_key_compatible());
        assert!(CqlType::Frozen(Box::new(CqlType::List(Box::new(CqlType::Int)))).is_key_compatible());
    }

    #[test]
    fn test_serde_as_string() {
        let ty: CqlType = serde_json::from_str("\"set<text>\"").unwrap();
        assert_eq!(ty, CqlType::Set(Box::new(CqlType::Text)));
        assert_eq!(serde_json::to_string(&ty).unwrap(), "\"set<text>\"");
    }
}
