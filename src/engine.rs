//! Analyzer engine
//!
//! Owns all derived state (schemas, suggestion sets, the relationship cache,
//! the comparison log) and exposes the engine's operation surface. Every
//! operation is synchronous and total: malformed input and missing ids
//! degrade to absent results, never to errors.

use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, warn};

use crate::compare::{self, Comparison};
use crate::infer;
use crate::library::DocumentRepository;
use crate::optimize::{OptimizationDetector, OptimizationSuggestion};
use crate::relations::{
    self, Relationship, RelationshipKind, RELATIONSHIP_THRESHOLD, SIMILAR_SCHEMA_THRESHOLD,
};
use crate::schema::Schema;
use crate::stats::{self, LibraryStats};

/// The schema inference and relationship engine
///
/// Holds at most one [`Schema`] per document: re-analysis replaces the prior
/// record and retires its schema id. All state is in-memory and scoped to
/// the running session.
#[derive(Debug, Default)]
pub struct AnalyzerEngine {
    /// Schema records keyed by schema id
    schemas: HashMap<String, Schema>,
    /// Current schema id per document
    schema_by_document: HashMap<String, String>,
    /// Caller-populated relationship cache, keyed by document id
    relationships: HashMap<String, Vec<Relationship>>,
    /// Current suggestion set per document
    optimizations: HashMap<String, Vec<OptimizationSuggestion>>,
    /// Log of every comparison created this session
    comparisons: Vec<Comparison>,
    detector: OptimizationDetector,
    next_seq: u64,
}

impl AnalyzerEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Analyze a document's content, storing the schema and suggestion set
    ///
    /// Returns the new schema id, or `None` when the content does not parse
    /// (a diagnostic is logged; nothing is stored). Re-analysis replaces the
    /// document's previous schema record and regenerates its suggestions
    /// wholesale.
    pub fn analyze_schema(&mut self, document_id: &str, content: &str) -> Option<String> {
        let parsed: Value = match serde_json::from_str(content) {
            Ok(parsed) => parsed,
            Err(error) => {
                warn!(document_id, %error, "schema analysis skipped: content is not valid JSON");
                return None;
            }
        };

        let root = infer::infer(&parsed);
        let schema_id = format!("schema_{}_{}", document_id, self.next_seq());
        let schema = Schema::new(schema_id.clone(), document_id, root);

        let mut suggestions = self.detector.detect(document_id, &schema.root);
        for suggestion in &mut suggestions {
            suggestion.id = format!("opt_{}", self.next_seq());
        }

        if let Some(previous) = self.schema_by_document.insert(document_id.to_string(), schema_id.clone()) {
            self.schemas.remove(&previous);
        }
        self.schemas.insert(schema_id.clone(), schema);
        if suggestions.is_empty() {
            self.optimizations.remove(document_id);
        } else {
            self.optimizations.insert(document_id.to_string(), suggestions);
        }

        debug!(document_id, %schema_id, "schema analyzed");
        Some(schema_id)
    }

    /// Look up a schema by schema id
    pub fn schema(&self, schema_id: &str) -> Option<&Schema> {
        self.schemas.get(schema_id)
    }

    /// Look up the current schema for a document
    pub fn schema_for_document(&self, document_id: &str) -> Option<&Schema> {
        self.schema_by_document
            .get(document_id)
            .and_then(|schema_id| self.schemas.get(schema_id))
    }

    /// All stored schemas, ordered by schema id
    pub fn all_schemas(&self) -> Vec<&Schema> {
        let mut schemas: Vec<&Schema> = self.schemas.values().collect();
        schemas.sort_by(|a, b| a.id.cmp(&b.id));
        schemas
    }

    /// Detect schema-match relationships from a source to candidate targets
    ///
    /// Documents that were never analyzed (source or target) are silently
    /// excluded; the result is empty rather than an error.
    pub fn detect_relationships(
        &self,
        source_id: &str,
        target_ids: &[String],
    ) -> Vec<Relationship> {
        let source = match self.schema_for_document(source_id) {
            Some(schema) => schema,
            None => {
                debug!(source_id, "relationship detection skipped: document was never analyzed");
                return Vec::new();
            }
        };

        let mut found = Vec::new();
        for target_id in target_ids {
            let target = match self.schema_for_document(target_id) {
                Some(schema) => schema,
                None => continue,
            };
            let confidence = relations::similarity(&source.root, &target.root);
            if confidence > RELATIONSHIP_THRESHOLD {
                found.push(Relationship {
                    source_id: source_id.to_string(),
                    target_id: target_id.clone(),
                    kind: RelationshipKind::SchemaMatch,
                    confidence,
                    common_paths: relations::common_paths(&source.root, &target.root),
                });
            }
        }
        found
    }

    /// Cached relationships for a document
    ///
    /// This cache is NOT populated by [`Self::detect_relationships`]; a
    /// caller that wants detection results served from here must wire the
    /// two together via [`Self::record_relationships`].
    pub fn relationships_for(&self, document_id: &str) -> &[Relationship] {
        self.relationships
            .get(document_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Store relationships into the cache, replacing the document's entry
    pub fn record_relationships(&mut self, document_id: &str, relationships: Vec<Relationship>) {
        self.relationships
            .insert(document_id.to_string(), relationships);
    }

    /// Current suggestion set for a document
    pub fn suggest_optimizations(&self, document_id: &str) -> &[OptimizationSuggestion] {
        self.optimizations
            .get(document_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every stored suggestion across all documents, highest impact first
    pub fn all_optimizations(&self) -> Vec<&OptimizationSuggestion> {
        let mut all: Vec<&OptimizationSuggestion> =
            self.optimizations.values().flatten().collect();
        all.sort_by(|a, b| b.impact.total_cmp(&a.impact).then_with(|| a.id.cmp(&b.id)));
        all
    }

    /// Similarity between two stored schemas, 0.0 when either id is unknown
    pub fn compare_schemas(&self, first_id: &str, second_id: &str) -> f64 {
        match (self.schemas.get(first_id), self.schemas.get(second_id)) {
            (Some(first), Some(second)) => relations::similarity(&first.root, &second.root),
            _ => 0.0,
        }
    }

    /// Stored schemas similar to the given one, most similar first
    pub fn find_similar_schemas(&self, schema_id: &str) -> Vec<&Schema> {
        let reference = match self.schemas.get(schema_id) {
            Some(schema) => schema,
            None => return Vec::new(),
        };

        let mut scored: Vec<(f64, &Schema)> = self
            .schemas
            .values()
            .filter(|candidate| candidate.id != schema_id)
            .map(|candidate| (relations::similarity(&reference.root, &candidate.root), candidate))
            .filter(|(score, _)| *score > SIMILAR_SCHEMA_THRESHOLD)
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.id.cmp(&b.1.id)));
        scored.into_iter().map(|(_, schema)| schema).collect()
    }

    /// Compare two documents field by field and log the outcome
    ///
    /// `None` when either document is missing or its content does not parse;
    /// nothing is logged in that case.
    pub fn create_comparison(
        &mut self,
        repository: &dyn DocumentRepository,
        first_id: &str,
        second_id: &str,
    ) -> Option<Comparison> {
        let first = repository.get(first_id)?;
        let second = repository.get(second_id)?;
        let outcome = match compare::compare_documents(&first.content, &second.content) {
            Some(outcome) => outcome,
            None => {
                debug!(first_id, second_id, "comparison unavailable: content does not parse");
                return None;
            }
        };

        let comparison = Comparison {
            id: format!("cmp_{}", self.next_seq()),
            first_id: first_id.to_string(),
            second_id: second_id.to_string(),
            similarity: outcome.similarity,
            common_fields: outcome.common_fields,
            differences: outcome.differences,
        };
        self.comparisons.push(comparison.clone());
        Some(comparison)
    }

    /// Every comparison created this session, in creation order
    pub fn comparisons(&self) -> &[Comparison] {
        &self.comparisons
    }

    /// Aggregate statistics across the library and the derived stores
    pub fn library_stats(&self, repository: &dyn DocumentRepository) -> LibraryStats {
        let suggestion_count = self.optimizations.values().map(Vec::len).sum();
        stats::aggregate(&repository.all(), &self.all_schemas(), suggestion_count)
    }

    /// Drop all derived state; documents are untouched
    pub fn clear(&mut self) {
        self.schemas.clear();
        self.schema_by_document.clear();
        self.relationships.clear();
        self.optimizations.clear();
        self.comparisons.clear();
    }

    fn next_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }
}
