//! Relationship graph assembly
//!
//! Builds a directed graph of documents and their detected relationships
//! for view layers (relations panels, graph canvases). The graph is
//! assembled on demand from the library and the engine; the engine never
//! caches it.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::compare;
use crate::engine::AnalyzerEngine;
use crate::library::DocumentRepository;
use crate::relations::RelationshipKind;

/// One edge of the relationship graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationEdge {
    pub kind: RelationshipKind,
    /// Confidence in [0, 1]; explicit references are always 1.0
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub common_paths: Option<Vec<String>>,
}

/// Directed graph of documents and their relationships
pub struct RelationGraph {
    graph: DiGraph<String, RelationEdge>,
    indices: HashMap<String, NodeIndex>,
}

impl RelationGraph {
    /// Assemble the graph from the library and the engine's schema store
    ///
    /// Edges, in precedence order per document pair:
    /// - `reference` for every explicit relation whose target still exists
    /// - `schema-match` from the detector, for analyzed documents
    /// - `common-field` for pairs sharing top-level fields without a schema
    ///   match
    pub fn build(repository: &dyn DocumentRepository, engine: &AnalyzerEngine) -> Self {
        let documents = repository.all();
        let mut graph = DiGraph::new();
        let mut indices = HashMap::new();

        for document in &documents {
            let index = graph.add_node(document.id.clone());
            indices.insert(document.id.clone(), index);
        }

        for document in &documents {
            for related_id in &document.related_ids {
                if let Some(&target) = indices.get(related_id) {
                    graph.add_edge(
                        indices[&document.id],
                        target,
                        RelationEdge {
                            kind: RelationshipKind::Reference,
                            confidence: 1.0,
                            common_paths: None,
                        },
                    );
                }
            }
        }

        let ids: Vec<String> = documents.iter().map(|d| d.id.clone()).collect();
        let mut matched_pairs: HashSet<(String, String)> = HashSet::new();
        for document in &documents {
            let targets: Vec<String> = ids
                .iter()
                .filter(|id| *id != &document.id)
                .cloned()
                .collect();
            for relationship in engine.detect_relationships(&document.id, &targets) {
                matched_pairs.insert(ordered_pair(&relationship.source_id, &relationship.target_id));
                graph.add_edge(
                    indices[&relationship.source_id],
                    indices[&relationship.target_id],
                    RelationEdge {
                        kind: relationship.kind,
                        confidence: relationship.confidence,
                        common_paths: relationship.common_paths,
                    },
                );
            }
        }

        for (i, first) in documents.iter().enumerate() {
            for second in documents.iter().skip(i + 1) {
                if matched_pairs.contains(&ordered_pair(&first.id, &second.id)) {
                    continue;
                }
                let outcome = match compare::compare_documents(&first.content, &second.content) {
                    Some(outcome) if !outcome.common_fields.is_empty() => outcome,
                    _ => continue,
                };
                graph.add_edge(
                    indices[&first.id],
                    indices[&second.id],
                    RelationEdge {
                        kind: RelationshipKind::CommonField,
                        confidence: outcome.similarity,
                        common_paths: Some(
                            outcome
                                .common_fields
                                .iter()
                                .map(|field| format!("$.{}", field))
                                .collect(),
                        ),
                    },
                );
            }
        }

        Self { graph, indices }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// All document ids in the graph, sorted
    pub fn document_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.indices.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Outgoing neighbors of a document, with the connecting edge
    pub fn neighbors(&self, document_id: &str) -> Vec<(&str, &RelationEdge)> {
        let index = match self.indices.get(document_id) {
            Some(&index) => index,
            None => return Vec::new(),
        };
        self.graph
            .edges_directed(index, Direction::Outgoing)
            .map(|edge| (self.graph[edge.target()].as_str(), edge.weight()))
            .collect()
    }

    /// Every edge as (source id, target id, edge)
    pub fn edges(&self) -> Vec<(&str, &str, &RelationEdge)> {
        self.graph
            .edge_references()
            .map(|edge| {
                (
                    self.graph[edge.source()].as_str(),
                    self.graph[edge.target()].as_str(),
                    edge.weight(),
                )
            })
            .collect()
    }
}

fn ordered_pair(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::{DocumentDraft, DocumentKind, DocumentLibrary};

    fn setup() -> (DocumentLibrary, AnalyzerEngine, Vec<String>) {
        let mut library = DocumentLibrary::new();
        let mut engine = AnalyzerEngine::new();
        let contents = [
            r#"{"x":1,"y":2,"z":3}"#,
            r#"{"x":9,"y":8,"z":7}"#,
            r#"{"q":1,"x":2}"#,
        ];
        let ids: Vec<String> = contents
            .iter()
            .enumerate()
            .map(|(i, content)| {
                let id = library.add(DocumentDraft::new(
                    format!("doc{}", i),
                    DocumentKind::Instance,
                    *content,
                ));
                engine.analyze_schema(&id, content);
                id
            })
            .collect();
        (library, engine, ids)
    }

    #[test]
    fn test_reference_edges_from_explicit_relations() {
        let (mut library, engine, ids) = setup();
        library.add_relation(&ids[0], &ids[2]);
        let graph = RelationGraph::build(&library, &engine);

        let references: Vec<_> = graph
            .edges()
            .into_iter()
            .filter(|(_, _, edge)| edge.kind == RelationshipKind::Reference)
            .collect();
        assert_eq!(references.len(), 1);
        assert_eq!(references[0].0, ids[0]);
        assert_eq!(references[0].1, ids[2]);
        assert_eq!(references[0].2.confidence, 1.0);
    }

    #[test]
    fn test_schema_match_edges_for_identical_shapes() {
        let (library, engine, ids) = setup();
        let graph = RelationGraph::build(&library, &engine);

        assert_eq!(graph.node_count(), 3);
        let matches: Vec<_> = graph
            .edges()
            .into_iter()
            .filter(|(_, _, edge)| edge.kind == RelationshipKind::SchemaMatch)
            .collect();
        // doc0 and doc1 share {x, y, z} exactly, detected in both directions
        assert_eq!(matches.len(), 2);
        assert!(matches
            .iter()
            .all(|(source, target, _)| (*source == ids[0] || *source == ids[1])
                && (*target == ids[0] || *target == ids[1])));
    }

    #[test]
    fn test_common_field_edges_below_match_threshold() {
        let (library, engine, ids) = setup();
        let graph = RelationGraph::build(&library, &engine);

        // doc2 shares only "x" with the others: similarity 1/4 misses the
        // schema-match threshold but still yields common-field edges
        let commons: Vec<_> = graph
            .edges()
            .into_iter()
            .filter(|(_, _, edge)| edge.kind == RelationshipKind::CommonField)
            .collect();
        assert_eq!(commons.len(), 2);
        for (_, target, edge) in commons {
            assert_eq!(target, ids[2]);
            assert_eq!(edge.common_paths, Some(vec!["$.x".to_string()]));
        }
    }

    #[test]
    fn test_neighbors_of_unknown_document_is_empty() {
        let (library, engine, _) = setup();
        let graph = RelationGraph::build(&library, &engine);
        assert!(graph.neighbors("missing").is_empty());
    }

    #[test]
    fn test_neighbors_lists_outgoing_edges() {
        let (library, engine, ids) = setup();
        let graph = RelationGraph::build(&library, &engine);
        let neighbors = graph.neighbors(&ids[0]);
        assert!(neighbors.iter().any(|(id, _)| *id == ids[1]));
    }
}
