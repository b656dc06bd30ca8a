//! Default decoding of stored field values.
//!
//! Field values are stored as structured text. The decoder parses them as a
//! YAML document, which also covers JSON, and normalizes two layouts:
//!
//! - sheet layout: `data.<sheet>.lDEF.<field>.vDEF` documents are flattened
//!   so each field maps directly to its value
//! - dotted names: `settings.title` becomes `{ settings: { title } }`

use recdata_types::NestedTree;
use recdata_util::nest_at_path;
use serde_json::Value;
use tracing::debug;

use crate::error::DecodeError;
use crate::merge::merge_into;

const SHEETS_KEY: &str = "data";
const LANGUAGE_KEY: &str = "lDEF";
const VALUE_KEY: &str = "vDEF";

/// Decodes a raw stored value into a nested tree.
///
/// Absent, null and blank values decode to an empty tree. Values that are
/// already objects are taken as they are.
pub fn decode_field_value(raw: Option<&Value>) -> Result<NestedTree, DecodeError> {
    let tree = match raw {
        None | Some(Value::Null) => return Ok(NestedTree::new()),
        Some(Value::String(text)) if text.trim().is_empty() => return Ok(NestedTree::new()),
        Some(Value::String(text)) => parse_document(text)?,
        Some(Value::Object(tree)) => tree.clone(),
        Some(other) => return Err(DecodeError::not_a_tree(value_kind(other))),
    };
    Ok(normalize(tree))
}

fn parse_document(text: &str) -> Result<NestedTree, DecodeError> {
    let document: Value = serde_yaml::from_str(text).map_err(|error| DecodeError::malformed(error.to_string()))?;
    match document {
        Value::Object(tree) => Ok(tree),
        // Comment-only documents parse to null.
        Value::Null => Ok(NestedTree::new()),
        other => Err(DecodeError::not_a_tree(value_kind(&other))),
    }
}

fn normalize(tree: NestedTree) -> NestedTree {
    match sheet_fields(&tree) {
        Some(sheets) => {
            debug!(sheet_count = sheets.len(), "flattening sheet layout");
            let mut flattened = NestedTree::new();
            for fields in sheets {
                merge_into(&mut flattened, expand_field_names(fields));
            }
            flattened
        }
        None => expand_field_names(tree),
    }
}

/// Expands dotted field names into nested subtrees, recursively.
///
/// Every entry is nested along its path and deep-merged into the result in
/// key order, so subtrees reached through different names are combined.
fn expand_field_names(flat: NestedTree) -> NestedTree {
    let mut expanded = NestedTree::new();
    for (name, value) in flat {
        let value = match value {
            Value::Object(inner) => Value::Object(expand_field_names(inner)),
            other => other,
        };
        merge_into(&mut expanded, nest_at_path(&name, value));
    }
    expanded
}

/// Returns the per-sheet `field -> value` maps when `tree` uses the sheet layout.
fn sheet_fields(tree: &NestedTree) -> Option<Vec<NestedTree>> {
    let sheets = tree.get(SHEETS_KEY)?.as_object()?;
    if sheets.is_empty() {
        return None;
    }
    sheets
        .values()
        .map(|sheet| {
            let fields = sheet.as_object()?.get(LANGUAGE_KEY)?.as_object()?;
            Some(
                fields
                    .iter()
                    .filter_map(|(name, field)| Some((name.clone(), field.as_object()?.get(VALUE_KEY)?.clone())))
                    .collect(),
            )
        })
        .collect()
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode_text(text: &str) -> Result<NestedTree, DecodeError> {
        decode_field_value(Some(&Value::String(text.to_string())))
    }

    #[test]
    fn absent_null_and_blank_values_decode_to_empty_tree() {
        assert!(decode_field_value(None).unwrap().is_empty());
        assert!(decode_field_value(Some(&Value::Null)).unwrap().is_empty());
        assert!(decode_text("").unwrap().is_empty());
        assert!(decode_text("  \n").unwrap().is_empty());
        assert!(decode_text("# nothing stored yet").unwrap().is_empty());
    }

    #[test]
    fn decodes_json_and_yaml_documents() {
        let from_json = decode_text(r#"{ "settings": { "title": "Hello" } }"#).unwrap();
        let from_yaml = decode_text("settings:\n  title: Hello\n").unwrap();
        assert_eq!(from_json, from_yaml);
        assert_eq!(Value::Object(from_yaml), json!({ "settings": { "title": "Hello" } }));
    }

    #[test]
    fn object_values_are_taken_as_is() {
        let stored = json!({ "columns": 2 });
        assert_eq!(Value::Object(decode_field_value(Some(&stored)).unwrap()), stored);
    }

    #[test]
    fn flattens_sheet_layout_and_expands_dotted_names() {
        let document = r#"
data:
  sDEF:
    lDEF:
      settings.title:
        vDEF: Hello
      settings.columns:
        vDEF: 2
  sOptions:
    lDEF:
      settings.columns:
        vDEF: 3
      switch:
        vDEF: 1
"#;
        let tree = decode_text(document).unwrap();
        assert_eq!(Value::Object(tree), json!({ "settings": { "title": "Hello", "columns": 3 }, "switch": 1 }));
    }

    #[test]
    fn dotted_names_merge_with_existing_subtrees() {
        let stored = json!({ "a": { "b": { "x": 1 } }, "a.b": { "y": 2 } });
        let tree = decode_field_value(Some(&stored)).unwrap();
        assert_eq!(Value::Object(tree), json!({ "a": { "b": { "x": 1, "y": 2 } } }));

        let nested = decode_text("settings:\n  display.title: Hello\nsettings.display.size: 3\n").unwrap();
        assert_eq!(Value::Object(nested), json!({ "settings": { "display": { "title": "Hello", "size": 3 } } }));
    }

    #[test]
    fn dot_only_names_are_kept() {
        let tree = decode_field_value(Some(&json!({ ".": 1, "..": { "a.b": 2 } }))).unwrap();
        assert_eq!(Value::Object(tree), json!({ ".": 1, "..": { "a": { "b": 2 } } }));
    }

    #[test]
    fn data_key_without_sheet_layout_is_plain_content() {
        let tree = decode_text("data:\n  rows: 4\n").unwrap();
        assert_eq!(Value::Object(tree), json!({ "data": { "rows": 4 } }));
    }

    #[test]
    fn malformed_documents_fail() {
        let err = decode_text("settings: [unterminated").unwrap_err();
        assert!(matches!(err, DecodeError::Malformed { .. }));
    }

    #[test]
    fn non_tree_values_fail() {
        assert_eq!(decode_text("- a\n- b\n").unwrap_err(), DecodeError::not_a_tree("array"));
        assert_eq!(decode_field_value(Some(&json!(42))).unwrap_err(), DecodeError::not_a_tree("number"));
    }
}
