//! Structural type inference
//!
//! Walks one parsed JSON value and produces a [`SchemaNode`] tree. The walk
//! is a pure fold with no cross-document state: the same value always yields
//! a structurally identical tree.

use serde_json::Value;
use std::collections::BTreeMap;

use crate::schema::{SchemaNode, ValueKind};

/// Maximum number of sample renderings kept per node
const SAMPLE_CAP: usize = 3;

/// Infer the structural schema of one parsed JSON value
///
/// Objects recurse into every entry. Arrays recurse into every element and
/// merge the results into one item type when all elements share a kind;
/// heterogeneous arrays become [`ValueKind::Mixed`] with no item type. Empty
/// arrays are homogeneous-by-default and carry no item type.
pub fn infer(value: &Value) -> SchemaNode {
    match value {
        Value::Null => sampled_leaf(ValueKind::Null, value),
        Value::Bool(_) => sampled_leaf(ValueKind::Boolean, value),
        Value::Number(_) => sampled_leaf(ValueKind::Number, value),
        Value::String(_) => sampled_leaf(ValueKind::String, value),
        Value::Object(entries) => {
            let mut children = BTreeMap::new();
            for (key, child) in entries {
                children.insert(key.clone(), infer(child));
            }
            let mut node = SchemaNode::leaf(ValueKind::Object);
            node.children = Some(children);
            node
        }
        Value::Array(elements) => infer_array(elements),
    }
}

fn sampled_leaf(kind: ValueKind, value: &Value) -> SchemaNode {
    let mut node = SchemaNode::leaf(kind);
    node.samples.push(value.to_string());
    node
}

fn infer_array(elements: &[Value]) -> SchemaNode {
    let mut node = SchemaNode::leaf(ValueKind::Array);
    if elements.is_empty() {
        return node;
    }

    let mut inferred = elements.iter().map(infer);
    let first = match inferred.next() {
        Some(first) => first,
        None => return node,
    };

    // Kinds are judged on the inferred nodes, not the raw values: a nested
    // array may itself reduce to `mixed`, which is distinct from `array`.
    let rest: Vec<SchemaNode> = inferred.collect();
    if rest.iter().all(|n| n.kind == first.kind) {
        let merged = rest.into_iter().fold(first, merge_nodes);
        node.item_type = Some(Box::new(merged));
    } else {
        node.kind = ValueKind::Mixed;
    }
    node
}

/// Merge two inferred nodes observed at the same position
///
/// Occurrence counts accumulate; object children union-merge with their
/// frequencies recomputed against the merged parent count. Disagreeing kinds
/// under the same key degrade to [`ValueKind::Mixed`].
fn merge_nodes(mut left: SchemaNode, right: SchemaNode) -> SchemaNode {
    if left.kind != right.kind {
        let mut mixed = SchemaNode::leaf(ValueKind::Mixed);
        mixed.occurrences = left.occurrences + right.occurrences;
        mixed.samples = left.samples;
        extend_samples(&mut mixed.samples, right.samples);
        return mixed;
    }

    left.occurrences += right.occurrences;
    extend_samples(&mut left.samples, right.samples);

    if let (Some(own), Some(other)) = (&mut left.children, right.children) {
        for (key, node) in other {
            match own.remove(&key) {
                Some(existing) => {
                    own.insert(key, merge_nodes(existing, node));
                }
                None => {
                    own.insert(key, node);
                }
            }
        }
    }
    if let Some(children) = &mut left.children {
        for child in children.values_mut() {
            child.frequency = child.occurrences as f64 / left.occurrences as f64;
        }
    }

    left.item_type = match (left.item_type.take(), right.item_type) {
        (Some(own), Some(other)) => Some(Box::new(merge_nodes(*own, *other))),
        (Some(own), None) => Some(own),
        (None, Some(other)) => Some(other),
        (None, None) => None,
    };
    left
}

fn extend_samples(samples: &mut Vec<String>, extra: Vec<String>) {
    for sample in extra {
        if samples.len() >= SAMPLE_CAP {
            break;
        }
        if !samples.contains(&sample) {
            samples.push(sample);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_kinds() {
        assert_eq!(infer(&json!(null)).kind, ValueKind::Null);
        assert_eq!(infer(&json!(true)).kind, ValueKind::Boolean);
        assert_eq!(infer(&json!(3.5)).kind, ValueKind::Number);
        assert_eq!(infer(&json!("hi")).kind, ValueKind::String);
    }

    #[test]
    fn test_empty_object_keeps_empty_children() {
        let node = infer(&json!({}));
        assert_eq!(node.kind, ValueKind::Object);
        assert_eq!(node.children.as_ref().map(|c| c.len()), Some(0));
    }

    #[test]
    fn test_nested_object() {
        let node = infer(&json!({"a": 1, "b": {"c": 2}}));
        assert_eq!(node.kind, ValueKind::Object);
        let children = node.children.as_ref().unwrap();
        assert_eq!(children.len(), 2);
        assert_eq!(children["a"].kind, ValueKind::Number);
        let b = &children["b"];
        assert_eq!(b.kind, ValueKind::Object);
        assert_eq!(b.children.as_ref().unwrap()["c"].kind, ValueKind::Number);
    }

    #[test]
    fn test_empty_array_is_homogeneous_by_default() {
        let node = infer(&json!([]));
        assert_eq!(node.kind, ValueKind::Array);
        assert!(node.item_type.is_none());
    }

    #[test]
    fn test_homogeneous_array_merges_elements() {
        let node = infer(&json!([{"id": 1, "name": "a"}, {"id": 2}, {"id": 3, "name": "c"}]));
        assert_eq!(node.kind, ValueKind::Array);
        let item = node.item_type.as_ref().unwrap();
        assert_eq!(item.kind, ValueKind::Object);
        assert_eq!(item.occurrences, 3);
        let children = item.children.as_ref().unwrap();
        assert_eq!(children["id"].occurrences, 3);
        assert_eq!(children["id"].frequency, 1.0);
        assert_eq!(children["name"].occurrences, 2);
        assert!((children["name"].frequency - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_heterogeneous_array_is_mixed() {
        let node = infer(&json!([1, "two", 3]));
        assert_eq!(node.kind, ValueKind::Mixed);
        assert!(node.item_type.is_none());
    }

    #[test]
    fn test_conflicting_key_kinds_degrade_to_mixed() {
        let node = infer(&json!([{"v": 1}, {"v": "one"}]));
        let item = node.item_type.as_ref().unwrap();
        let v = &item.children.as_ref().unwrap()["v"];
        assert_eq!(v.kind, ValueKind::Mixed);
        assert_eq!(v.occurrences, 2);
    }

    #[test]
    fn test_nested_array_of_mixed_is_distinct_kind() {
        // Inner arrays reduce to `array` and `mixed`, so the outer one is mixed
        let node = infer(&json!([[1, 2], [1, "x"]]));
        assert_eq!(node.kind, ValueKind::Mixed);
    }

    #[test]
    fn test_samples_capped_and_deduplicated() {
        let node = infer(&json!([1, 1, 2, 3, 4]));
        let item = node.item_type.as_ref().unwrap();
        assert_eq!(item.samples.len(), SAMPLE_CAP);
        assert_eq!(item.samples, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_inference_is_deterministic() {
        let value = json!({"users": [{"id": 1, "tags": ["a"]}, {"id": 2, "tags": []}]});
        assert_eq!(infer(&value), infer(&value));
    }
}
