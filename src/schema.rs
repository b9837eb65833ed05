//! Schema types and structures

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::fingerprint::{self, Fingerprint};

/// Inferred kind of one JSON subtree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// JSON object with named properties
    Object,
    /// Array whose elements all reduce to one kind
    Array,
    /// String value
    String,
    /// Number value (integer or float)
    Number,
    /// Boolean value
    Boolean,
    /// Null value
    Null,
    /// Array whose elements reduce to more than one kind
    Mixed,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Object => "object",
            ValueKind::Array => "array",
            ValueKind::String => "string",
            ValueKind::Number => "number",
            ValueKind::Boolean => "boolean",
            ValueKind::Null => "null",
            ValueKind::Mixed => "mixed",
        };
        write!(f, "{}", name)
    }
}

/// One node of an inferred schema tree
///
/// Invariants:
/// - `children` is `Some` iff `kind == Object` (an empty object keeps an
///   empty map)
/// - `item_type` is `Some` iff `kind == Array` and the array was non-empty
///   and homogeneous
/// - inside a merged array item type, `occurrences` counts the elements
///   carrying a key and `frequency` is `occurrences / element count`;
///   everywhere else both stay at 1
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaNode {
    /// Inferred kind of this subtree
    #[serde(rename = "type")]
    pub kind: ValueKind,
    /// How many times this shape was observed
    pub occurrences: u64,
    /// Ratio of observations relative to the enclosing shape, in [0, 1]
    pub frequency: f64,
    /// Example literal renderings (primitives only, capped)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub samples: Vec<String>,
    /// Property name to child schema, present only for objects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<BTreeMap<String, SchemaNode>>,
    /// Element schema, present only for homogeneous non-empty arrays
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_type: Option<Box<SchemaNode>>,
}

impl SchemaNode {
    /// Create a leaf node of the given kind
    pub fn leaf(kind: ValueKind) -> Self {
        Self {
            kind,
            occurrences: 1,
            frequency: 1.0,
            samples: Vec::new(),
            children: None,
            item_type: None,
        }
    }

    /// Top-level property names, empty for non-object nodes
    pub fn property_names(&self) -> Vec<&str> {
        self.children
            .as_ref()
            .map(|c| c.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Number of direct properties, 0 for non-object nodes
    pub fn property_count(&self) -> usize {
        self.children.as_ref().map(BTreeMap::len).unwrap_or(0)
    }
}

/// One inference result for a document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schema {
    /// Unique identifier of this analysis result
    pub id: String,
    /// Identifier of the source document
    pub document_id: String,
    /// Root of the inferred schema tree
    pub root: SchemaNode,
    /// Short structural digest, collision-tolerant
    pub fingerprint: Fingerprint,
    /// Bounded structural complexity score in [0, 100]
    pub complexity: u8,
}

impl Schema {
    /// Create a schema record, deriving fingerprint and complexity from the root
    pub fn new(id: impl Into<String>, document_id: impl Into<String>, root: SchemaNode) -> Self {
        let fingerprint = Fingerprint::of(&root);
        let complexity = fingerprint::complexity(&root);
        Self {
            id: id.into(),
            document_id: document_id.into(),
            root,
            fingerprint,
            complexity,
        }
    }
}
