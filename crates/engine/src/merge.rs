//! Deterministic deep merge of nested trees.
//!
//! Trees are folded left to right. When both sides hold a subtree at the same
//! key the subtrees are merged recursively; any other collision is won by the
//! right-hand value. Keys present on only one side are kept as they are.

use recdata_types::NestedTree;
use serde_json::Value;

/// Merges an ordered sequence of trees into one. Later trees override earlier ones.
///
/// An empty sequence produces an empty tree; a single tree is returned unchanged.
pub fn merge_trees<I>(trees: I) -> NestedTree
where
    I: IntoIterator<Item = NestedTree>,
{
    let mut trees = trees.into_iter();
    let Some(mut accumulator) = trees.next() else {
        return NestedTree::new();
    };
    for overlay in trees {
        merge_into(&mut accumulator, overlay);
    }
    accumulator
}

/// Overlays `overlay` onto `base` in place.
pub fn merge_into(base: &mut NestedTree, overlay: NestedTree) {
    for (key, value) in overlay {
        match value {
            Value::Object(incoming) => {
                if let Some(Value::Object(existing)) = base.get_mut(&key) {
                    merge_into(existing, incoming);
                } else {
                    base.insert(key, Value::Object(incoming));
                }
            }
            scalar => {
                base.insert(key, scalar);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tree(value: Value) -> NestedTree {
        value.as_object().cloned().expect("object literal")
    }

    #[test]
    fn empty_sequence_yields_empty_tree() {
        assert!(merge_trees(Vec::new()).is_empty());
    }

    #[test]
    fn single_tree_is_returned_unchanged() {
        let only = tree(json!({ "a": { "b": [1, 2] } }));
        assert_eq!(merge_trees(vec![only.clone()]), only);
    }

    #[test]
    fn disjoint_subtree_keys_are_combined() {
        let merged = merge_trees(vec![tree(json!({ "a": { "x": 1 } })), tree(json!({ "a": { "y": 2 } }))]);
        assert_eq!(Value::Object(merged), json!({ "a": { "x": 1, "y": 2 } }));
    }

    #[test]
    fn tree_replaces_scalar_and_scalar_replaces_tree() {
        let tree_wins = merge_trees(vec![tree(json!({ "a": 1 })), tree(json!({ "a": { "x": 2 } }))]);
        assert_eq!(Value::Object(tree_wins), json!({ "a": { "x": 2 } }));

        let scalar_wins = merge_trees(vec![tree(json!({ "a": { "x": 2 } })), tree(json!({ "a": "flat" }))]);
        assert_eq!(Value::Object(scalar_wins), json!({ "a": "flat" }));
    }

    #[test]
    fn arrays_are_replaced_not_concatenated() {
        let merged = merge_trees(vec![tree(json!({ "items": [1, 2, 3] })), tree(json!({ "items": [9] }))]);
        assert_eq!(Value::Object(merged), json!({ "items": [9] }));
    }

    #[test]
    fn deep_nesting_is_lossless_for_disjoint_keys() {
        let merged = merge_trees(vec![
            tree(json!({ "a": { "b": { "c": 1, "keep": true } }, "top": 0 })),
            tree(json!({ "a": { "b": { "c": 2, "d": 3 } } })),
            tree(json!({ "a": { "e": 4 } })),
        ]);
        assert_eq!(
            Value::Object(merged),
            json!({ "a": { "b": { "c": 2, "d": 3, "keep": true }, "e": 4 }, "top": 0 })
        );
    }
}
