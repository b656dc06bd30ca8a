use anyhow::Result;
use recdata_types::{NestedTree, Record};

use super::DataProvider;
use crate::decode::decode_field_value;
use crate::merge::merge_into;

/// Decodes the stored field value and lays it over a set of defaults.
///
/// This is the standard provider for fields whose values are edited through
/// a form: the form's default values fill in whatever the stored document
/// does not set.
#[derive(Debug, Clone, Default)]
pub struct FieldValueProvider {
    defaults: NestedTree,
}

impl FieldValueProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults(defaults: NestedTree) -> Self {
        Self { defaults }
    }
}

impl DataProvider for FieldValueProvider {
    fn produce_values(&self, record: &Record, field: &str) -> Result<NestedTree> {
        let mut values = self.defaults.clone();
        merge_into(&mut values, decode_field_value(record.field(field))?);
        Ok(values)
    }

    fn name(&self) -> &str {
        "field-value"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn stored_values_override_defaults() {
        let defaults = json!({ "settings": { "title": "Untitled", "columns": 1 } }).as_object().cloned().unwrap();
        let provider = FieldValueProvider::with_defaults(defaults);
        let record = Record::new("tt_content", json!({ "pi_flexform": "{\"settings\": {\"title\": \"Hello\"}}" }).as_object().cloned().unwrap());

        let values = provider.produce_values(&record, "pi_flexform").unwrap();
        assert_eq!(Value::Object(values), json!({ "settings": { "title": "Hello", "columns": 1 } }));
    }

    #[test]
    fn decode_failures_are_reported() {
        let record = Record::new("tt_content", json!({ "pi_flexform": "settings: [" }).as_object().cloned().unwrap());
        let err = FieldValueProvider::new().produce_values(&record, "pi_flexform").unwrap_err();
        assert!(err.downcast_ref::<crate::error::DecodeError>().is_some());
    }
}
