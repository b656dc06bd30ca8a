//! Source record resolution.
//!
//! The record a field belongs to comes from the first of three sources that
//! yields one: an explicit record supplied by the caller, the data of the
//! surrounding content node, or a store lookup by primary key.

use recdata_types::{NestedTree, Record};
use tracing::{debug, warn};

use crate::error::ResolveError;
use crate::store::RecordStore;

/// Where the resolved record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordSource {
    Explicit,
    Contextual,
    Store,
}

/// Resolves the record a resolution call operates on.
#[derive(Debug, Clone, Copy)]
pub struct RecordResolver<'store> {
    store: &'store dyn RecordStore,
}

impl<'store> RecordResolver<'store> {
    pub fn new(store: &'store dyn RecordStore) -> Self {
        Self { store }
    }

    /// Resolves the record for `table`/`field`.
    ///
    /// The store is only queried when neither an explicit record nor a
    /// contextual node is available. Nothing found anywhere is a
    /// [`ResolveError::RecordResolution`] naming the attempted uid.
    pub fn resolve(
        &self,
        explicit: Option<&NestedTree>,
        contextual: Option<NestedTree>,
        table: &str,
        field: &str,
        uid: u64,
    ) -> Result<(Record, RecordSource), ResolveError> {
        if let Some(row) = explicit {
            debug!(table = %table, "using explicit record");
            return Ok((Record::from_row(table, row.clone()), RecordSource::Explicit));
        }
        if let Some(row) = contextual {
            debug!(table = %table, "using contextual node data as record");
            return Ok((Record::from_row(table, row), RecordSource::Contextual));
        }

        match self.store.fetch_one(table, uid).map_err(ResolveError::Store)? {
            Some(record) => {
                debug!(table = %table, uid, "record loaded from store");
                Ok((record, RecordSource::Store))
            }
            None => {
                warn!(table = %table, field = %field, uid, "record not found");
                Err(ResolveError::record_resolution(table, field, uid))
            }
        }
    }
}
