//! # Record Data Resolution
//!
//! [`DataResolver`] turns a `(table, field)` request into a nested tree:
//!
//! 1. the pair is validated against the schema registry
//! 2. the source record is resolved (explicit, contextual node, store)
//! 3. the providers applicable to that record are selected
//! 4. the provider chain runs, falling back to the default decoder
//! 5. the tree is returned, or bound to a variable while nested content renders
//!
//! Every step is a hard precondition for the next; no error is recovered.
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use recdata_engine::{DataRequest, DataResolver, InMemoryRecordStore, ProviderList};
//! use recdata_registry::SchemaCatalog;
//! use serde_json::json;
//!
//! let schema = SchemaCatalog::default().with_table("tt_content", ["pi_flexform"]);
//! let resolver = DataResolver::new(Arc::new(schema), Arc::new(InMemoryRecordStore::new()), Arc::new(ProviderList::new()));
//!
//! let row = json!({ "pi_flexform": "settings:\n  title: Hello\n" });
//! let request = DataRequest::new("tt_content", "pi_flexform").with_record(row.as_object().cloned().unwrap());
//! let tree = resolver.resolve_data(&request, None)?;
//! assert_eq!(tree["settings"]["title"], "Hello");
//! # Ok::<(), recdata_engine::ResolveError>(())
//! ```

use std::sync::Arc;

use recdata_registry::SchemaRegistry;
use recdata_types::{FieldDescriptor, NestedTree};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::ResolveError;
use crate::provider::{ProviderResolver, resolve_with_providers};
use crate::record::RecordResolver;
use crate::scope::{ScopeFrame, VariableScope};
use crate::store::RecordStore;

/// Options of a single resolution call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataRequest {
    /// Table owning the field
    pub table: String,
    /// Field holding the stored value
    pub field: String,
    /// Primary key used for the store lookup (0 when unset)
    #[serde(default)]
    pub uid: Option<u64>,
    /// Explicit record; when present no store lookup happens
    #[serde(default)]
    pub record: Option<NestedTree>,
    /// Variable name to expose the result under instead of returning it
    #[serde(default, rename = "as")]
    pub as_name: Option<String>,
}

impl DataRequest {
    pub fn new(table: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            field: field.into(),
            ..Default::default()
        }
    }

    pub fn with_uid(mut self, uid: u64) -> Self {
        self.uid = Some(uid);
        self
    }

    pub fn with_record(mut self, record: NestedTree) -> Self {
        self.record = Some(record);
        self
    }

    pub fn exposed_as(mut self, name: impl Into<String>) -> Self {
        self.as_name = Some(name.into());
        self
    }

    fn variable_name(&self) -> Option<&str> {
        self.as_name.as_deref().filter(|name| !name.is_empty())
    }
}

/// Content surrounding a resolution call, owned by the rendering layer.
pub trait NestedContent {
    /// Key/value data of the node, when the node is addressable as a record.
    fn record_data(&self) -> Option<NestedTree> {
        None
    }

    /// Renders the content with `scope` in effect.
    fn render(&mut self, scope: &mut dyn VariableScope) -> anyhow::Result<Value>;
}

/// Content that carries no data and renders nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoContent;

impl NestedContent for NoContent {
    fn render(&mut self, _scope: &mut dyn VariableScope) -> anyhow::Result<Value> {
        Ok(Value::Null)
    }
}

/// Outcome of [`DataResolver::resolve_and_expose`].
#[derive(Debug, Clone, PartialEq)]
pub enum Exposure {
    /// No variable name was requested; the resolved tree itself.
    Data(NestedTree),
    /// The output of the nested content rendered with the tree bound.
    Rendered(Value),
}

impl Exposure {
    pub fn into_data(self) -> Option<NestedTree> {
        match self {
            Exposure::Data(tree) => Some(tree),
            Exposure::Rendered(_) => None,
        }
    }

    pub fn into_rendered(self) -> Option<Value> {
        match self {
            Exposure::Rendered(value) => Some(value),
            Exposure::Data(_) => None,
        }
    }
}

/// Resolves record field data through the schema registry, record store and providers.
#[derive(Debug, Clone)]
pub struct DataResolver {
    schema: Arc<dyn SchemaRegistry>,
    store: Arc<dyn RecordStore>,
    providers: Arc<dyn ProviderResolver>,
}

impl DataResolver {
    pub fn new(schema: Arc<dyn SchemaRegistry>, store: Arc<dyn RecordStore>, providers: Arc<dyn ProviderResolver>) -> Self {
        Self { schema, store, providers }
    }

    /// Validates the request, resolves its record and runs the provider chain.
    ///
    /// `contextual` is the data of the surrounding content node; it is only
    /// consulted when the request carries no explicit record.
    pub fn resolve_data(&self, request: &DataRequest, contextual: Option<NestedTree>) -> Result<NestedTree, ResolveError> {
        let table = request.table.as_str();
        let field = request.field.as_str();

        let descriptor = FieldDescriptor::new(table, field);
        if !self.schema.contains(&descriptor) {
            warn!(descriptor = %descriptor, "table:field rejected by schema registry");
            return Err(ResolveError::schema_validation(table, field));
        }

        let uid = request.uid.unwrap_or_default();
        let (record, source) = RecordResolver::new(self.store.as_ref()).resolve(request.record.as_ref(), contextual, table, field, uid)?;
        let providers = self.providers.resolve_providers(table, field, &record);
        debug!(table = %table, field = %field, provider_count = providers.len(), "running provider chain");

        let values = resolve_with_providers(&providers, &record, field)?;
        info!(
            table = %table,
            field = %field,
            source = ?source,
            provider_count = providers.len(),
            key_count = values.len(),
            "record data resolved"
        );
        Ok(values)
    }

    /// Resolves the data and either returns it or exposes it to `content`.
    ///
    /// With a variable name in the request the tree is bound to that name in
    /// `scope` while `content` renders; the previous binding is restored
    /// afterwards whether rendering succeeds or fails.
    pub fn resolve_and_expose(
        &self,
        request: &DataRequest,
        content: &mut dyn NestedContent,
        scope: &mut dyn VariableScope,
    ) -> Result<Exposure, ResolveError> {
        let contextual = match request.record {
            Some(_) => None,
            None => content.record_data(),
        };
        let values = self.resolve_data(request, contextual)?;

        let Some(name) = request.variable_name() else {
            return Ok(Exposure::Data(values));
        };

        let rendered = {
            let mut frame = ScopeFrame::bind(scope, name, Value::Object(values));
            content.render(frame.scope_mut())
        };
        rendered.map(Exposure::Rendered).map_err(ResolveError::Content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderList;
    use crate::scope::VariableMap;
    use crate::store::InMemoryRecordStore;
    use recdata_registry::SchemaCatalog;
    use serde_json::json;

    fn resolver() -> DataResolver {
        let schema = SchemaCatalog::default().with_table("tt_content", ["pi_flexform"]);
        DataResolver::new(Arc::new(schema), Arc::new(InMemoryRecordStore::new()), Arc::new(ProviderList::new()))
    }

    #[test]
    fn request_deserializes_as_option() {
        let request: DataRequest = serde_json::from_value(json!({
            "table": "tt_content",
            "field": "pi_flexform",
            "uid": 3,
            "as": "settings"
        }))
        .unwrap();
        assert_eq!(request.uid, Some(3));
        assert_eq!(request.as_name.as_deref(), Some("settings"));
        assert!(request.record.is_none());
    }

    #[test]
    fn empty_variable_name_returns_data() {
        let request = DataRequest::new("tt_content", "pi_flexform")
            .with_record(json!({ "pi_flexform": "a: 1" }).as_object().cloned().unwrap())
            .exposed_as("");
        let mut scope = VariableMap::new();
        let exposure = resolver().resolve_and_expose(&request, &mut NoContent, &mut scope).unwrap();
        assert_eq!(exposure.into_data().map(Value::Object), Some(json!({ "a": 1 })));
        assert!(scope.is_empty());
    }
}
