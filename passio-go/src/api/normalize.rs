//! Collection shape normalization.
//!
//! The API sends the same logical collection either as a JSON array or as an
//! object whose keys are synthetic ids and whose values are the records. This
//! module is the single place that branches on that shape: everything
//! downstream sees an ordered `Vec` of records.

use serde_json::{Map, Value};

use super::error::ShapeError;

/// A decoded upstream collection, in whichever shape the API chose.
#[derive(Debug, Clone, PartialEq)]
pub enum Collection {
    /// Records in document order.
    List(Vec<Value>),
    /// Records keyed by a synthetic id, in document order.
    Keyed(Map<String, Value>),
}

impl Collection {
    /// Classify a decoded value.
    ///
    /// `null` (the collection was absent) is an empty list. Scalars are not a
    /// collection of any shape.
    pub fn from_value(collection: &'static str, value: Value) -> Result<Self, ShapeError> {
        match value {
            Value::Array(items) => Ok(Collection::List(items)),
            Value::Object(map) => Ok(Collection::Keyed(map)),
            Value::Null => Ok(Collection::List(Vec::new())),
            other => Err(ShapeError {
                collection,
                found: kind_of(&other),
            }),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Collection::List(items) => items.len(),
            Collection::Keyed(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The records in order, keys discarded.
    pub fn into_records(self) -> Vec<Value> {
        match self {
            Collection::List(items) => items,
            Collection::Keyed(map) => map.into_iter().map(|(_, record)| record).collect(),
        }
    }

    /// The records in order, with their keys where the shape had any.
    pub fn into_entries(self) -> Vec<(Option<String>, Value)> {
        match self {
            Collection::List(items) => items.into_iter().map(|record| (None, record)).collect(),
            Collection::Keyed(map) => map
                .into_iter()
                .map(|(key, record)| (Some(key), record))
                .collect(),
        }
    }
}

/// Canonicalize a collection to an ordered sequence of records.
pub fn normalize(collection: &'static str, value: Value) -> Result<Vec<Value>, ShapeError> {
    Collection::from_value(collection, value).map(Collection::into_records)
}

/// Canonicalize a collection, keeping the keys of a keyed mapping.
pub fn normalize_entries(
    collection: &'static str,
    value: Value,
) -> Result<Vec<(Option<String>, Value)>, ShapeError> {
    Collection::from_value(collection, value).map(Collection::into_entries)
}

/// Name of a JSON value's kind, for diagnostics.
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}
