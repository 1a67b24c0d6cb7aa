//! Flat persistence representation
//!
//! Entities map to and from a [`Record`]: a flat mapping of string keys to
//! primitive values, the shape key-value stores speak natively. Numeric
//! values coming back from such stores arrive as arbitrary-precision
//! decimals; [`Value::normalize`] folds those to integers when exact and
//! floats otherwise, recursively, so domain logic never sees the
//! storage-native numeric type.

use crate::domain::errors::LaudoError;
use crate::domain::result::Result;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Primary-key prefix for exam records
pub const EXAM_KEY_PREFIX: &str = "ECG_EXAM";

/// Primary-key prefix for user records
pub const USER_KEY_PREFIX: &str = "USER";

/// A primitive value inside a [`Record`]
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Arbitrary-precision numeric as returned by key-value stores.
    /// Only ever observed on read; [`Value::normalize`] removes it.
    Decimal(String),
    List(Vec<Value>),
    Map(Record),
}

impl Value {
    /// Folds `Decimal` values into `Int` when exact, `Float` otherwise,
    /// recursively through lists and maps.
    pub fn normalize(self) -> Value {
        match self {
            Value::Decimal(repr) => normalize_decimal(&repr),
            Value::List(items) => Value::List(items.into_iter().map(Value::normalize).collect()),
            Value::Map(map) => Value::Map(map.normalize()),
            other => other,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric accessor; accepts both integer and float representations
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Record> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Reads an epoch-seconds value back as a UTC instant
    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::Int(secs) => DateTime::from_timestamp(*secs, 0),
            Value::Float(secs) => DateTime::from_timestamp(secs.trunc() as i64, 0),
            _ => None,
        }
    }

    /// Serializes a UTC instant to epoch seconds
    pub fn from_timestamp(at: DateTime<Utc>) -> Value {
        Value::Int(at.timestamp())
    }

    /// Maps `None` to `Null`
    pub fn opt<T: Into<Value>>(value: Option<T>) -> Value {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

fn normalize_decimal(repr: &str) -> Value {
    // Exact integers (including "3.0") become Int, everything else Float.
    if let Ok(n) = repr.parse::<i64>() {
        return Value::Int(n);
    }
    match repr.parse::<f64>() {
        Ok(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 => {
            Value::Int(f as i64)
        }
        Ok(f) => Value::Float(f),
        // Unparseable numerics are preserved as strings rather than dropped
        Err(_) => Value::Str(repr.to_string()),
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<Record> for Value {
    fn from(map: Record) -> Self {
        Value::Map(map)
    }
}

/// A flat persistence record: string keys to primitive [`Value`]s
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record(BTreeMap<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a field, converting the value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Required field accessor; missing or null fields fail with
    /// [`LaudoError::Validation`]
    pub fn require(&self, key: &str) -> Result<&Value> {
        match self.0.get(key) {
            Some(value) if !value.is_null() => Ok(value),
            _ => Err(LaudoError::Validation(format!(
                "missing required field '{key}'"
            ))),
        }
    }

    /// Optional field accessor; absent and null are both `None`
    pub fn optional(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    /// Normalizes every value in place (see [`Value::normalize`])
    pub fn normalize(self) -> Record {
        Record(
            self.0
                .into_iter()
                .map(|(k, v)| (k, v.normalize()))
                .collect(),
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Record(iter.into_iter().collect())
    }
}

/// Builds a primary key from a type prefix and a bare identifier
pub fn make_key(prefix: &str, id: &str) -> String {
    format!("{prefix}#{id}")
}

/// Recovers the bare identifier from a prefixed primary key
///
/// Splits on the first `#` only, so identifiers containing `#` survive
/// the round trip.
pub fn split_key<'a>(pk: &'a str, expected_prefix: &str) -> Result<&'a str> {
    match pk.split_once('#') {
        Some((prefix, id)) if prefix == expected_prefix => Ok(id),
        _ => Err(LaudoError::Validation(format!(
            "malformed primary key '{pk}', expected '{expected_prefix}#<id>'"
        ))),
    }
}
