//! Error types for record data resolution.

use thiserror::Error;

/// Failure of a single resolution call.
///
/// Schema and record errors carry the diagnostic fields callers present to
/// users. Provider, store, decode and nested-content failures pass through
/// with their original message.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Invalid table:field \"{table}:{field}\" - does not exist in schema registry.")]
    SchemaValidation { table: String, field: String },

    #[error(
        "Either table \"{table}\", field \"{field}\" or record with uid {uid} do not exist and you did not manually provide the \"record\" attribute."
    )]
    RecordResolution { table: String, field: String, uid: u64 },

    #[error(transparent)]
    Provider(anyhow::Error),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Store(anyhow::Error),

    #[error(transparent)]
    Content(anyhow::Error),
}

/// The stored field value could not be turned into a nested tree.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Malformed field value: {reason}")]
    Malformed { reason: String },

    #[error("Field value does not decode to a key/value tree (found {found})")]
    NotATree { found: String },
}

impl ResolveError {
    /// Create a schema validation error.
    pub fn schema_validation(table: impl Into<String>, field: impl Into<String>) -> Self {
        Self::SchemaValidation {
            table: table.into(),
            field: field.into(),
        }
    }

    /// Create a record resolution error.
    pub fn record_resolution(table: impl Into<String>, field: impl Into<String>, uid: u64) -> Self {
        Self::RecordResolution {
            table: table.into(),
            field: field.into(),
            uid,
        }
    }
}

impl DecodeError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed { reason: reason.into() }
    }

    pub fn not_a_tree(found: impl Into<String>) -> Self {
        Self::NotATree { found: found.into() }
    }
}
