//! Relationship detection between inferred schemas
//!
//! Similarity is scored on the top level only: it is a fast structural
//! overlap ratio, deliberately not a deep diff.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::schema::{SchemaNode, ValueKind};

/// Minimum similarity for a schema-match relationship
pub const RELATIONSHIP_THRESHOLD: f64 = 0.3;

/// Minimum similarity for [`crate::engine::AnalyzerEngine::find_similar_schemas`]
pub const SIMILAR_SCHEMA_THRESHOLD: f64 = 0.5;

/// How two documents relate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationshipKind {
    /// One document explicitly references the other
    Reference,
    /// The inferred schemas overlap structurally
    SchemaMatch,
    /// The documents share top-level fields
    CommonField,
}

/// A directed, computed relationship between two documents
///
/// Produced transiently by detection; never persisted beyond the query that
/// asked for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relationship {
    pub source_id: String,
    pub target_id: String,
    pub kind: RelationshipKind,
    /// Structural-overlap confidence in [0, 1]
    pub confidence: f64,
    /// Shared structural paths, when any exist
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub common_paths: Option<Vec<String>>,
}

/// Similarity between two schema trees, in [0, 1]
///
/// Different kinds score 0. Matching kinds score a 0.5 base, except when
/// both are objects with non-empty children, where the score becomes the
/// Jaccard ratio over the two key sets (replacing the base, not averaging
/// with it). Symmetric by construction.
pub fn similarity(a: &SchemaNode, b: &SchemaNode) -> f64 {
    if a.kind != b.kind {
        return 0.0;
    }
    if a.kind == ValueKind::Object {
        if let (Some(left), Some(right)) = (&a.children, &b.children) {
            if !left.is_empty() && !right.is_empty() {
                let keys_a: BTreeSet<&str> = left.keys().map(String::as_str).collect();
                let keys_b: BTreeSet<&str> = right.keys().map(String::as_str).collect();
                let common = keys_a.intersection(&keys_b).count();
                let total = keys_a.union(&keys_b).count();
                return common as f64 / total as f64;
            }
        }
    }
    0.5
}

/// Top-level paths present in both trees, `$`-rooted
///
/// `None` when either tree is not an object or nothing is shared.
pub fn common_paths(a: &SchemaNode, b: &SchemaNode) -> Option<Vec<String>> {
    let (left, right) = (a.children.as_ref()?, b.children.as_ref()?);
    let paths: Vec<String> = left
        .keys()
        .filter(|key| right.contains_key(*key))
        .map(|key| format!("$.{}", key))
        .collect();
    if paths.is_empty() {
        None
    } else {
        Some(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infer::infer;
    use serde_json::json;

    #[test]
    fn test_different_kinds_score_zero() {
        let a = infer(&json!({"a": 1}));
        let b = infer(&json!([1, 2]));
        assert_eq!(similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_matching_scalars_score_base() {
        let a = infer(&json!(1));
        let b = infer(&json!(2));
        assert_eq!(similarity(&a, &b), 0.5);
    }

    #[test]
    fn test_object_overlap_is_jaccard() {
        let a = infer(&json!({"x": 1, "y": 2}));
        let b = infer(&json!({"x": 3, "z": 4}));
        // {x} over {x, y, z}
        assert!((similarity(&a, &b) - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_disjoint_objects_score_zero() {
        let a = infer(&json!({"a": 1}));
        let b = infer(&json!({"b": 1}));
        assert_eq!(similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_empty_objects_keep_base_score() {
        let a = infer(&json!({}));
        let b = infer(&json!({"a": 1}));
        assert_eq!(similarity(&a, &b), 0.5);
    }

    #[test]
    fn test_similarity_is_symmetric() {
        let shapes = vec![
            infer(&json!({"a": 1, "b": 2})),
            infer(&json!({"b": 2, "c": 3})),
            infer(&json!([1, 2, 3])),
            infer(&json!("scalar")),
            infer(&json!({})),
        ];
        for a in &shapes {
            for b in &shapes {
                assert_eq!(similarity(a, b), similarity(b, a));
            }
        }
    }

    #[test]
    fn test_common_paths_are_dollar_rooted() {
        let a = infer(&json!({"x": 1, "y": 2}));
        let b = infer(&json!({"x": 3, "z": 4}));
        assert_eq!(common_paths(&a, &b), Some(vec!["$.x".to_string()]));
    }

    #[test]
    fn test_common_paths_absent_for_non_objects() {
        let a = infer(&json!([1]));
        let b = infer(&json!([2]));
        assert_eq!(common_paths(&a, &b), None);
    }
}
