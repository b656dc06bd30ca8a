//! Data providers and the provider chain.
//!
//! Modules:
//! - `chain`: ordered invocation of providers and merge of their contributions
//! - `list`: ordered provider list used as the default provider resolver
//! - `field_value`: provider decoding the stored field value over defaults
//! - `static_values`: provider returning a fixed tree
//! - `null`: provider contributing nothing, for tests and disabled scenarios

mod chain;
mod field_value;
mod list;
mod null;
mod static_values;

use std::{fmt::Debug, sync::Arc};

use anyhow::Result;
use recdata_types::{NestedTree, Record};

pub use chain::resolve_with_providers;
pub use field_value::FieldValueProvider;
pub use list::ProviderList;
pub use null::NullProvider;
pub use static_values::StaticProvider;

/// A pluggable source of partial data for a record's field.
///
/// Implementations return the part of the tree they know about. The chain
/// merges every contribution in order, so a provider only needs to return
/// the keys it wants to set or override.
pub trait DataProvider: Send + Sync + Debug {
    /// Produce this provider's contribution for `field` of `record`.
    fn produce_values(&self, record: &Record, field: &str) -> Result<NestedTree>;

    /// Label used in logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Whether the provider applies to the given target. Defaults to always.
    fn triggers(&self, _table: &str, _field: &str, _record: &Record) -> bool {
        true
    }
}

/// Selects the ordered providers applicable to a resolved record.
pub trait ProviderResolver: Send + Sync + Debug {
    fn resolve_providers(&self, table: &str, field: &str, record: &Record) -> Vec<Arc<dyn DataProvider>>;
}
