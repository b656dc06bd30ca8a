//! Shared value types for record data resolution.
//!
//! These types travel between the schema registry, the record store, the
//! providers and the resolver, so they live in their own crate with no
//! dependencies beyond serde.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value};

/// A nested key/value tree.
///
/// Object values are subtrees; every other JSON value (including arrays) is
/// treated as a scalar leaf.
pub type NestedTree = JsonMap<String, Value>;

/// Name of the column holding a record's primary key.
pub const PRIMARY_KEY_COLUMN: &str = "uid";

/// A single row attached to an owning table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Table the row belongs to
    pub table: String,
    /// Primary key, when the row carries one
    #[serde(default)]
    pub uid: Option<u64>,
    /// Column values keyed by field name
    #[serde(default)]
    pub fields: NestedTree,
}

impl Record {
    /// Creates a record without a primary key.
    pub fn new(table: impl Into<String>, fields: NestedTree) -> Self {
        Self {
            table: table.into(),
            uid: None,
            fields,
        }
    }

    /// Creates a record from a raw row, reading the primary key from the `uid` column.
    ///
    /// Integer and numeric string values are both accepted for the key. Any
    /// other shape leaves the record without a primary key.
    pub fn from_row(table: impl Into<String>, row: NestedTree) -> Self {
        let uid = row.get(PRIMARY_KEY_COLUMN).and_then(primary_key_from_value);
        Self {
            table: table.into(),
            uid,
            fields: row,
        }
    }

    /// Sets the primary key.
    pub fn with_uid(mut self, uid: u64) -> Self {
        self.uid = Some(uid);
        self
    }

    /// Returns the raw value stored in `field`, if any.
    pub fn field(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}

fn primary_key_from_value(value: &Value) -> Option<u64> {
    match value {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// A `(table, field)` pair checked against the schema registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldDescriptor {
    pub table: String,
    pub field: String,
}

impl FieldDescriptor {
    pub fn new(table: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            field: field.into(),
        }
    }
}

impl fmt::Display for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.table, self.field)
    }
}
