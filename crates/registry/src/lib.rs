//! Schema registry for record data resolution.
//!
//! The registry is the source of truth for which `table:field` combinations
//! are legal resolution targets. Callers depend on the [`SchemaRegistry`]
//! trait; [`SchemaCatalog`] is the in-memory implementation loaded from a
//! YAML or JSON schema document.

use std::fmt::Debug;

pub mod config;
pub mod models;

pub use config::{RegistryConfig, default_config_path};
pub use models::{ColumnSchema, SchemaCatalog, TableSchema};
pub use recdata_types::FieldDescriptor;

/// Read-only lookup answering whether a column exists on a table.
pub trait SchemaRegistry: Send + Sync + Debug {
    /// Returns `true` when `table` exists and declares a column named `field`.
    fn exists(&self, table: &str, field: &str) -> bool;

    /// Convenience wrapper over [`SchemaRegistry::exists`] for a descriptor.
    fn contains(&self, descriptor: &FieldDescriptor) -> bool {
        self.exists(&descriptor.table, &descriptor.field)
    }
}
