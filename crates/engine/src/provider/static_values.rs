use anyhow::Result;
use recdata_types::{NestedTree, Record};

use super::DataProvider;

/// Contributes a fixed tree, optionally only for one table.
#[derive(Debug, Clone)]
pub struct StaticProvider {
    name: String,
    values: NestedTree,
    table: Option<String>,
}

impl StaticProvider {
    pub fn new(name: impl Into<String>, values: NestedTree) -> Self {
        Self {
            name: name.into(),
            values,
            table: None,
        }
    }

    /// Restricts the provider to records of `table`.
    pub fn for_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }
}

impl DataProvider for StaticProvider {
    fn produce_values(&self, _record: &Record, _field: &str) -> Result<NestedTree> {
        Ok(self.values.clone())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn triggers(&self, table: &str, _field: &str, _record: &Record) -> bool {
        self.table.as_deref().is_none_or(|only| only == table)
    }
}
