//! Field-level comparison of two raw documents
//!
//! Works directly on document text, independent of the schema store, so a
//! view can show a live diff for unanalyzed documents.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// A stored comparison between two documents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comparison {
    /// Unique identifier of this comparison
    pub id: String,
    pub first_id: String,
    pub second_id: String,
    /// Field-overlap score in [0, 1]
    pub similarity: f64,
    /// Top-level field names present in both documents, sorted
    pub common_fields: Vec<String>,
    /// Count of fields differing or absent between the two
    pub differences: usize,
}

/// Outcome of comparing two raw documents, before an id is attached
#[derive(Debug, Clone, PartialEq)]
pub struct FieldComparison {
    pub similarity: f64,
    pub common_fields: Vec<String>,
    pub differences: usize,
}

/// Compare two documents' raw content field by field
///
/// Returns `None` when either text fails to parse: the comparison is
/// unavailable, not an error to surface. Non-object top levels contribute an
/// empty field set. A 0/0 overlap scores 0.0, never NaN.
pub fn compare_documents(first: &str, second: &str) -> Option<FieldComparison> {
    let first: Value = serde_json::from_str(first).ok()?;
    let second: Value = serde_json::from_str(second).ok()?;

    let fields_a = top_level_fields(&first);
    let fields_b = top_level_fields(&second);
    let common_fields: Vec<String> = fields_a.intersection(&fields_b).cloned().collect();

    let larger = fields_a.len().max(fields_b.len());
    let similarity = if larger == 0 {
        0.0
    } else {
        common_fields.len() as f64 / larger as f64
    };
    let differences = fields_a.len().abs_diff(fields_b.len())
        + (fields_a.len() + fields_b.len() - 2 * common_fields.len());

    Some(FieldComparison {
        similarity,
        common_fields,
        differences,
    })
}

fn top_level_fields(value: &Value) -> BTreeSet<String> {
    match value {
        Value::Object(entries) => entries.keys().cloned().collect(),
        _ => BTreeSet::new(),
    }
}
