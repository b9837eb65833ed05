//! Fingerprint and complexity scoring for schema trees

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::schema::SchemaNode;

/// Hex characters kept from the digest
const FINGERPRINT_LEN: usize = 16;

/// Multiplier applied to the raw node count before clamping
const COMPLEXITY_SCALE: u64 = 10;

/// Upper bound of the complexity score
const COMPLEXITY_CEILING: u64 = 100;

/// Short structural digest of a schema tree
///
/// Identical trees always produce identical fingerprints. The digest is
/// truncated and collision-tolerant: it is an approximate-equality token for
/// dashboards, not an integrity check.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Compute the fingerprint of a schema tree
    ///
    /// The tree serializes with sorted property names, so the digest is
    /// stable across runs for structurally identical trees.
    pub fn of(node: &SchemaNode) -> Self {
        let canonical = serde_json::to_string(node).unwrap_or_default();
        Self::from_str(&canonical)
    }

    /// Compute a fingerprint from a string
    pub fn from_str(content: &str) -> Self {
        let hash = Sha256::digest(content.as_bytes());
        let hex = format!("{:x}", hash);
        Self(hex[..FINGERPRINT_LEN].to_string())
    }

    /// Get the hex string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Fingerprint {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Bounded complexity score of a schema tree, in [0, 100]
///
/// Counts one unit per node, scaled and clamped so that very deep or wide
/// trees saturate at 100 instead of growing without bound.
pub fn complexity(node: &SchemaNode) -> u8 {
    let scaled = raw_complexity(node).saturating_mul(COMPLEXITY_SCALE);
    scaled.min(COMPLEXITY_CEILING) as u8
}

fn raw_complexity(node: &SchemaNode) -> u64 {
    let mut total: u64 = 1;
    if let Some(children) = &node.children {
        for child in children.values() {
            total = total.saturating_add(raw_complexity(child));
        }
    }
    if let Some(item) = &node.item_type {
        total = total.saturating_add(raw_complexity(item));
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infer::infer;
    use serde_json::json;

    #[test]
    fn test_fingerprint_consistency() {
        let first = infer(&json!({"a": 1, "b": {"c": true}}));
        let second = infer(&json!({"a": 1, "b": {"c": true}}));
        assert_eq!(Fingerprint::of(&first), Fingerprint::of(&second));
    }

    #[test]
    fn test_fingerprint_differs_for_different_shapes() {
        let first = infer(&json!({"a": 1}));
        let second = infer(&json!({"a": "1"}));
        assert_ne!(Fingerprint::of(&first), Fingerprint::of(&second));
    }

    #[test]
    fn test_fingerprint_is_short_hex() {
        let node = infer(&json!(null));
        let fp = Fingerprint::of(&node);
        assert_eq!(fp.as_str().len(), FINGERPRINT_LEN);
        assert!(fp.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_complexity_scales_with_breadth() {
        let scalar = complexity(&infer(&json!(1)));
        let flat = complexity(&infer(&json!({"a": 1, "b": 2})));
        let nested = complexity(&infer(&json!({"a": 1, "b": {"c": 2, "d": 3}})));
        assert_eq!(scalar, 10);
        assert!(flat > scalar);
        assert!(nested > flat);
    }

    #[test]
    fn test_complexity_clamps_at_100() {
        // 15 properties -> raw 16 -> scaled 160 -> clamped
        let mut obj = serde_json::Map::new();
        for i in 0..15 {
            obj.insert(format!("field{}", i), json!(i));
        }
        let score = complexity(&infer(&serde_json::Value::Object(obj)));
        assert_eq!(score, 100);
    }
}
