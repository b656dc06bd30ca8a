//! Record store abstraction.
//!
//! Persistence is owned by the caller; the resolver only needs a lookup of
//! one row by table and primary key. [`InMemoryRecordStore`] backs tests and
//! the CLI's fixture files.

use std::{fmt::Debug, path::Path};

use anyhow::{Context, Result};
use indexmap::IndexMap;
use recdata_types::{NestedTree, Record};
use tracing::{debug, warn};

/// Lookup of single records by primary key.
pub trait RecordStore: Send + Sync + Debug {
    /// Returns the row of `table` whose primary key is `uid`, or `None` when absent.
    fn fetch_one(&self, table: &str, uid: u64) -> Result<Option<Record>>;
}

/// Rows held in memory, keyed by table then primary key.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecordStore {
    tables: IndexMap<String, IndexMap<u64, Record>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a record under its table and primary key, replacing any previous row.
    ///
    /// Records without a primary key cannot be looked up and are skipped;
    /// returns whether the record was stored.
    pub fn insert(&mut self, record: Record) -> bool {
        let Some(uid) = record.uid else {
            warn!(table = %record.table, "skipping record without primary key");
            return false;
        };
        self.tables.entry(record.table.clone()).or_default().insert(uid, record);
        true
    }

    pub fn with_record(mut self, record: Record) -> Self {
        self.insert(record);
        self
    }

    /// Parses a fixture document of shape `{ <table>: [ { uid: 1, ... }, ... ] }`.
    ///
    /// YAML is accepted, and therefore JSON as well.
    pub fn from_document(content: &str) -> Result<Self> {
        let rows: IndexMap<String, Vec<NestedTree>> = serde_yaml::from_str(content).context("invalid record fixture document")?;
        let mut store = Self::new();
        for (table, table_rows) in rows {
            for row in table_rows {
                store.insert(Record::from_row(table.clone(), row));
            }
        }
        Ok(store)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).with_context(|| format!("Failed to read records file: {}", path.display()))?;
        let store = Self::from_document(&content).with_context(|| format!("Failed to parse records file: {}", path.display()))?;
        debug!(path = %path.display(), table_count = store.tables.len(), "record fixtures loaded");
        Ok(store)
    }
}

impl RecordStore for InMemoryRecordStore {
    fn fetch_one(&self, table: &str, uid: u64) -> Result<Option<Record>> {
        Ok(self.tables.get(table).and_then(|rows| rows.get(&uid)).cloned())
    }
}
