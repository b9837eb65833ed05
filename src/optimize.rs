//! Optimization detection
//!
//! Walks an inferred schema tree and emits heuristic refactoring
//! suggestions. Suggestions carry the `$`-rooted path of the opportunity so
//! a view can highlight it without re-walking the schema.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::schema::{SchemaNode, ValueKind};

/// Item count above which an object array becomes a normalization candidate
const NORMALIZE_MIN_ITEMS: u64 = 100;

/// Item count above which the suggestion is rated high severity
const HIGH_SEVERITY_ITEMS: u64 = 1000;

/// Estimated KB saved per item-field pair when normalizing
const SIZE_WEIGHT_KB: f64 = 0.05;

/// Estimated complexity percentage saved per extracted field
const COMPLEXITY_WEIGHT_PCT: u32 = 10;

/// Kind of refactoring opportunity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuggestionKind {
    /// Repeated structure worth extracting into a class document
    ExtractSchema,
    /// Large homogeneous object array worth normalizing into references
    NormalizeArray,
    /// Duplicated values worth deduplicating
    Deduplicate,
    /// General restructuring opportunity
    Refactor,
}

/// How urgent a suggestion is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// Estimated effect of applying a suggestion
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EstimatedSavings {
    /// Approximate size reduction in KB
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_kb: Option<u64>,
    /// Approximate complexity reduction in percent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity_pct: Option<u32>,
}

/// One heuristic refactoring hint for a document
///
/// The set for a document is regenerated wholesale on every analysis; ids
/// are stamped by the engine at storage time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationSuggestion {
    /// Unique identifier, assigned when the suggestion is stored
    pub id: String,
    /// Identifier of the owning document
    pub document_id: String,
    /// Kind of opportunity
    pub kind: SuggestionKind,
    /// Urgency rating
    pub severity: Severity,
    /// Human-readable description
    pub description: String,
    /// Impact score in [0, 100]
    pub impact: f64,
    /// Estimated savings of applying the suggestion
    pub savings: EstimatedSavings,
    /// Structural paths where the opportunity was found, `$`-rooted
    pub affected_paths: Vec<String>,
}

/// Walks schema trees for refactoring opportunities
#[derive(Debug)]
pub struct OptimizationDetector {
    /// Keys matching this pattern join paths in dot notation, others bracket
    identifier: Regex,
}

impl Default for OptimizationDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl OptimizationDetector {
    pub fn new() -> Self {
        Self {
            identifier: Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap(),
        }
    }

    /// Detect opportunities in a schema tree, recursing into every child
    ///
    /// Suggestion ids are left empty here; the engine assigns them when the
    /// set is stored.
    pub fn detect(&self, document_id: &str, root: &SchemaNode) -> Vec<OptimizationSuggestion> {
        let mut suggestions = Vec::new();
        self.walk("$", root, document_id, &mut suggestions);
        suggestions
    }

    fn walk(
        &self,
        path: &str,
        node: &SchemaNode,
        document_id: &str,
        out: &mut Vec<OptimizationSuggestion>,
    ) {
        if node.kind == ValueKind::Array {
            if let Some(suggestion) = self.normalize_array_candidate(path, node, document_id) {
                out.push(suggestion);
            }
        }
        if let Some(children) = &node.children {
            for (key, child) in children {
                self.walk(&self.join(path, key), child, document_id, out);
            }
        }
    }

    /// A large homogeneous array of objects is cheaper as a class document
    /// plus references. The item count is a proxy derived from the maximum
    /// occurrence count across the item type's children, not an exact count.
    fn normalize_array_candidate(
        &self,
        path: &str,
        node: &SchemaNode,
        document_id: &str,
    ) -> Option<OptimizationSuggestion> {
        let item = node.item_type.as_deref()?;
        if item.kind != ValueKind::Object {
            return None;
        }
        let children = item.children.as_ref()?;
        let estimated_items = children.values().map(|c| c.occurrences).max()?;
        if estimated_items <= NORMALIZE_MIN_ITEMS {
            return None;
        }

        let field_count = children.len();
        let severity = if estimated_items > HIGH_SEVERITY_ITEMS {
            Severity::High
        } else {
            Severity::Medium
        };
        let impact = ((estimated_items - NORMALIZE_MIN_ITEMS) as f64 / 10.0).min(100.0);
        let size_kb = ((estimated_items * field_count as u64) as f64 * SIZE_WEIGHT_KB).ceil() as u64;

        Some(OptimizationSuggestion {
            id: String::new(),
            document_id: document_id.to_string(),
            kind: SuggestionKind::NormalizeArray,
            severity,
            description: format!(
                "Array of {} items can be normalized: extract a class structure and use references",
                estimated_items
            ),
            impact,
            savings: EstimatedSavings {
                size_kb: Some(size_kb),
                complexity_pct: Some(field_count as u32 * COMPLEXITY_WEIGHT_PCT),
            },
            affected_paths: vec![path.to_string()],
        })
    }

    fn join(&self, path: &str, key: &str) -> String {
        if self.identifier.is_match(key) {
            format!("{}.{}", path, key)
        } else {
            format!("{}[\"{}\"]", path, key)
        }
    }
}
