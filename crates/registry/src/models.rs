use std::path::Path;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::SchemaRegistry;

/// Declared columns of every known table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaCatalog {
    /// Table definitions keyed by table name
    #[serde(default)]
    pub tables: IndexMap<String, TableSchema>,
}

/// Column definitions of a single table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    #[serde(default)]
    pub columns: IndexMap<String, ColumnSchema>,
}

/// Definition of one column. The registry only cares that the column exists;
/// the remaining metadata is carried for callers that select providers by it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnSchema {
    /// Free-form column kind (e.g. `text`, `flex`)
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// Column configuration as declared in the schema document
    #[serde(default)]
    pub config: Value,
}

impl SchemaCatalog {
    /// Adds a table with the given column names, replacing any previous definition.
    pub fn with_table<I, S>(mut self, table: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns = columns
            .into_iter()
            .map(|column| (column.into(), ColumnSchema::default()))
            .collect();
        self.tables.insert(table.into(), TableSchema { columns });
        self
    }

    /// Declares a single column, creating the table when needed.
    pub fn insert_column(&mut self, table: impl Into<String>, field: impl Into<String>, column: ColumnSchema) {
        self.tables.entry(table.into()).or_default().columns.insert(field.into(), column);
    }

    /// Parses a schema document. YAML is accepted, and therefore JSON as well.
    pub fn from_document(content: &str) -> Result<Self> {
        let catalog: SchemaCatalog = serde_yaml::from_str(content).context("invalid schema document")?;
        Ok(catalog)
    }

    /// Loads a schema document from disk.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).with_context(|| format!("Failed to read schema file: {}", path.display()))?;
        let catalog = Self::from_document(&content).with_context(|| format!("Failed to parse schema file: {}", path.display()))?;
        debug!(path = %path.display(), table_count = catalog.tables.len(), "schema catalog loaded");
        Ok(catalog)
    }

    /// Returns every declared pair as `(table, field)` in declaration order.
    pub fn field_pairs(&self) -> Vec<(&str, &str)> {
        self.tables
            .iter()
            .flat_map(|(table, schema)| schema.columns.keys().map(move |field| (table.as_str(), field.as_str())))
            .collect()
    }

    /// Looks up the column definition for a pair.
    pub fn column(&self, table: &str, field: &str) -> Option<&ColumnSchema> {
        self.tables.get(table)?.columns.get(field)
    }
}

impl SchemaRegistry for SchemaCatalog {
    fn exists(&self, table: &str, field: &str) -> bool {
        self.column(table, field).is_some()
    }
}
