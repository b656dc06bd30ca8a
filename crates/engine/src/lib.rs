//! # Recdata Engine
//!
//! Resolves the structured data attached to one field of a stored record.
//! A chain of pluggable providers contributes partial trees that are deep
//! merged in order; without providers the stored value is decoded directly.
//!
//! ## Architecture
//!
//! - **`merge`**: deterministic deep merge of nested trees
//! - **`decode`**: default decoder for stored field values
//! - **`provider`**: provider trait, concrete providers and the provider chain
//! - **`store`**: record store trait and in-memory store
//! - **`record`**: explicit / contextual / stored record precedence
//! - **`scope`**: variable scope and the restoring [`ScopeFrame`]
//! - **`resolve`**: the [`DataResolver`] orchestrating all of the above

pub mod decode;
pub mod error;
pub mod merge;
pub mod provider;
pub mod record;
pub mod resolve;
pub mod scope;
pub mod store;

pub use decode::decode_field_value;
pub use error::{DecodeError, ResolveError};
pub use merge::{merge_into, merge_trees};
pub use provider::{
    DataProvider, FieldValueProvider, NullProvider, ProviderList, ProviderResolver, StaticProvider, resolve_with_providers,
};
pub use record::{RecordResolver, RecordSource};
pub use resolve::{DataRequest, DataResolver, Exposure, NestedContent, NoContent};
pub use scope::{ScopeFrame, VariableMap, VariableScope};
pub use store::{InMemoryRecordStore, RecordStore};

pub use recdata_types::{FieldDescriptor, NestedTree, Record};
