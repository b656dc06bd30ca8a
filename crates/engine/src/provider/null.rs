use anyhow::Result;
use recdata_types::{NestedTree, Record};

use super::DataProvider;

#[derive(Debug, Clone, Copy, Default)]
pub struct NullProvider;

impl DataProvider for NullProvider {
    fn produce_values(&self, _record: &Record, _field: &str) -> Result<NestedTree> {
        Ok(NestedTree::new())
    }

    fn name(&self) -> &str {
        "null"
    }
}
