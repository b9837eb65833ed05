//! Library statistics aggregation
//!
//! Pure read-side aggregation across the document library, the schema
//! store, and the stored suggestion sets. No side effects.

use serde::{Deserialize, Serialize};

use crate::library::{Document, DocumentKind};
use crate::schema::Schema;

/// Aggregated counts and averages for a document library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryStats {
    pub total_documents: usize,
    pub total_classes: usize,
    pub total_instances: usize,
    /// Sum of relation-list lengths halved, assuming symmetric relations.
    /// Asymmetric relations yield fractional values; the quirk is accepted
    /// for display purposes.
    pub total_relations: f64,
    /// Mean complexity of stored schemas, 0.0 when none exist
    pub average_complexity: f64,
    pub total_optimization_opportunities: usize,
}

/// Compute statistics over the given documents, schemas, and suggestion count
pub fn aggregate(
    documents: &[&Document],
    schemas: &[&Schema],
    optimization_count: usize,
) -> LibraryStats {
    let total_classes = documents
        .iter()
        .filter(|d| d.kind == DocumentKind::Class)
        .count();
    let relation_entries: usize = documents.iter().map(|d| d.related_ids.len()).sum();

    let average_complexity = if schemas.is_empty() {
        0.0
    } else {
        let total: u64 = schemas.iter().map(|s| s.complexity as u64).sum();
        total as f64 / schemas.len() as f64
    };

    LibraryStats {
        total_documents: documents.len(),
        total_classes,
        total_instances: documents.len() - total_classes,
        total_relations: relation_entries as f64 / 2.0,
        average_complexity,
        total_optimization_opportunities: optimization_count,
    }
}
