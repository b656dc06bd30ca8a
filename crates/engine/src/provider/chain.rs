use std::sync::Arc;

use recdata_types::{NestedTree, Record};
use tracing::{debug, warn};

use super::DataProvider;
use crate::decode::decode_field_value;
use crate::error::ResolveError;
use crate::merge::merge_trees;

/// Runs every provider in order and merges their contributions.
///
/// Without providers the stored value of `field` is decoded instead. The
/// first failing provider aborts the chain and its error is returned as is;
/// providers after it are not invoked.
pub fn resolve_with_providers(providers: &[Arc<dyn DataProvider>], record: &Record, field: &str) -> Result<NestedTree, ResolveError> {
    if providers.is_empty() {
        debug!(table = %record.table, field = %field, "no providers, decoding stored value");
        return Ok(decode_field_value(record.field(field))?);
    }

    let mut contributions = Vec::with_capacity(providers.len());
    for provider in providers {
        let values = provider.produce_values(record, field).map_err(|error| {
            warn!(provider = %provider.name(), table = %record.table, field = %field, error = %error, "provider failed");
            ResolveError::Provider(error)
        })?;
        debug!(provider = %provider.name(), key_count = values.len(), "provider contributed values");
        contributions.push(values);
    }
    Ok(merge_trees(contributions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{NullProvider, StaticProvider};
    use anyhow::anyhow;
    use serde_json::{Value, json};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct FailingProvider {
        calls: AtomicUsize,
    }

    impl DataProvider for FailingProvider {
        fn produce_values(&self, _record: &Record, _field: &str) -> anyhow::Result<NestedTree> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(anyhow!("backend offline"))
        }
    }

    #[derive(Debug, Default)]
    struct CountingProvider {
        calls: AtomicUsize,
    }

    impl DataProvider for CountingProvider {
        fn produce_values(&self, _record: &Record, _field: &str) -> anyhow::Result<NestedTree> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(NestedTree::new())
        }
    }

    fn tree(value: Value) -> NestedTree {
        value.as_object().cloned().expect("object literal")
    }

    fn content_record(fields: Value) -> Record {
        Record::from_row("tt_content", tree(fields))
    }

    #[test]
    fn empty_provider_list_decodes_stored_value() {
        let record = content_record(json!({ "uid": 1, "pi_flexform": "settings:\n  title: Stored\n" }));
        let result = resolve_with_providers(&[], &record, "pi_flexform").unwrap();
        assert_eq!(Value::Object(result), json!({ "settings": { "title": "Stored" } }));
    }

    #[test]
    fn empty_provider_list_with_missing_field_yields_empty_tree() {
        let record = content_record(json!({}));
        assert!(resolve_with_providers(&[], &record, "pi_flexform").unwrap().is_empty());
    }

    #[test]
    fn later_providers_override_earlier_ones() {
        let providers: Vec<Arc<dyn DataProvider>> = vec![
            Arc::new(StaticProvider::new("first", tree(json!({ "foo": { "bar": "test" } })))),
            Arc::new(StaticProvider::new(
                "second",
                tree(json!({ "foo": { "bar": "test2", "baz": "test" }, "bar": "test" })),
            )),
        ];
        let record = content_record(json!({ "uid": 1 }));
        for _ in 0..3 {
            let result = resolve_with_providers(&providers, &record, "pi_flexform").unwrap();
            assert_eq!(Value::Object(result), json!({ "foo": { "bar": "test2", "baz": "test" }, "bar": "test" }));
        }
    }

    #[test]
    fn empty_contributions_are_merged_silently() {
        let providers: Vec<Arc<dyn DataProvider>> = vec![
            Arc::new(StaticProvider::new("values", tree(json!({ "a": 1 })))),
            Arc::new(NullProvider),
        ];
        let result = resolve_with_providers(&providers, &content_record(json!({})), "pi_flexform").unwrap();
        assert_eq!(Value::Object(result), json!({ "a": 1 }));
    }

    #[test]
    fn failing_provider_aborts_the_chain() {
        let failing = Arc::new(FailingProvider::default());
        let after = Arc::new(CountingProvider::default());
        let providers: Vec<Arc<dyn DataProvider>> = vec![
            Arc::new(StaticProvider::new("before", tree(json!({ "a": 1 })))),
            failing.clone(),
            after.clone(),
        ];

        let err = resolve_with_providers(&providers, &content_record(json!({})), "pi_flexform").unwrap_err();
        assert!(matches!(err, ResolveError::Provider(_)));
        assert_eq!(err.to_string(), "backend offline");
        assert_eq!(failing.calls.load(Ordering::SeqCst), 1);
        assert_eq!(after.calls.load(Ordering::SeqCst), 0);
    }
}
