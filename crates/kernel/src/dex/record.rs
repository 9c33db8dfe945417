//! Open, string-keyed records flowing through the dex pipeline.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::DexError;

/// One row of domain data (a character, an item, a trait...).
///
/// Field sets vary per page and per dataset, so a record is an open map of
/// field name to JSON value. The record also remembers which keys it derived
/// itself, so the enricher can recompute them without tripping the
/// collision check on a second pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: Map<String, Value>,

    #[serde(skip)]
    derived: BTreeSet<String>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from a JSON value; only objects are records.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self::from(fields)),
            _ => None,
        }
    }

    /// Raw access to a field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Whether the key exists at all (even when null).
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Text form of a field. `null` is treated as absent.
    pub fn text(&self, key: &str) -> Option<String> {
        self.fields.get(key).and_then(value_to_text)
    }

    /// Text form of a field when it is present and not blank.
    pub fn present(&self, key: &str) -> Option<String> {
        self.text(key).filter(|s| !s.trim().is_empty())
    }

    /// Set a source field, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Set a field only if the record does not already carry it.
    ///
    /// Returns `true` when the value was written.
    pub fn insert_if_absent(&mut self, key: &str, value: &Value) -> bool {
        if self.fields.contains_key(key) {
            return false;
        }
        self.fields.insert(key.to_string(), value.clone());
        true
    }

    /// Write a derived field.
    ///
    /// Fails with [`DexError::FieldCollision`] when the key already holds a
    /// source value. Keys this record derived earlier are recomputed.
    pub fn set_derived(&mut self, key: &str, value: impl Into<Value>) -> Result<(), DexError> {
        if self.fields.contains_key(key) && !self.derived.contains(key) {
            return Err(DexError::FieldCollision {
                field: key.to_string(),
            });
        }
        self.fields.insert(key.to_string(), value.into());
        self.derived.insert(key.to_string());
        Ok(())
    }

    /// Whether the key was written by the enricher.
    pub fn is_derived(&self, key: &str) -> bool {
        self.derived.contains(key)
    }

    /// Iterate over all fields.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Borrow the underlying map.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Self {
            fields,
            derived: BTreeSet::new(),
        }
    }
}

/// Convert a JSON value to its text representation for comparison.
/// Returns `None` for null so absent and null never match anything.
pub fn value_to_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}
