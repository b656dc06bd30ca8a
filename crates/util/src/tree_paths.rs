//! Dotted-path helpers for nested trees.
//!
//! Stored field layouts address nested values with dotted names such as
//! `settings.title`. These helpers turn such names into nested trees.

use recdata_types::NestedTree;
use serde_json::Value;

/// Splits a dotted name into its non-empty segments.
///
/// Empty segments (`a..b`, leading or trailing dots) are skipped. A name made
/// only of dots has no usable segment and is kept verbatim as one segment.
pub fn path_segments(path: &str) -> Vec<&str> {
    let segments: Vec<&str> = path.split('.').filter(|segment| !segment.is_empty()).collect();
    if segments.is_empty() { vec![path] } else { segments }
}

/// Wraps `value` in one subtree per segment of the dotted `path`.
///
/// `nest_at_path("a.b", 1)` yields `{ a: { b: 1 } }`. The result holds a single
/// top-level key, so callers combine several paths with a deep merge.
pub fn nest_at_path(path: &str, value: Value) -> NestedTree {
    let segments = path_segments(path);
    let Some((first, rest)) = segments.split_first() else {
        return NestedTree::new();
    };
    let nested = rest.iter().rev().fold(value, |inner, segment| {
        let mut wrapper = NestedTree::new();
        wrapper.insert(segment.to_string(), inner);
        Value::Object(wrapper)
    });
    let mut tree = NestedTree::new();
    tree.insert(first.to_string(), nested);
    tree
}
