//! JSON Lens
//!
//! Schema inference and cross-document relationship analysis for growing
//! collections of JSON documents.
//!
//! ## Features
//!
//! - **Type Inference**: Recursive structural schemas from parsed JSON values
//! - **Fingerprinting**: Stable, collision-tolerant digests for approximate
//!   schema equality
//! - **Complexity Scoring**: Bounded heuristic scores for dashboards
//! - **Optimization Detection**: Refactoring suggestions from schema shape
//! - **Relationship Detection**: Structural-overlap scoring between documents
//! - **Field Comparison**: Live field-level diff of two raw documents
//!
//! ## Architecture
//!
//! ```text
//! DocumentLibrary ──content──▶ AnalyzerEngine
//!                               ├── infer        (schema trees)
//!                               ├── fingerprint  (digest + complexity)
//!                               ├── optimize     (suggestions)
//!                               ├── relations    (similarity)
//!                               └── compare      (field diffs)
//!                                     │
//!                               RelationGraph (on-demand view assembly)
//! ```
//!
//! All engine state is in-memory and scoped to the running session; the
//! library owns document content and the engine only derives from it.

pub mod compare;
pub mod config;
pub mod engine;
pub mod error;
pub mod fingerprint;
pub mod graph;
pub mod infer;
pub mod library;
pub mod optimize;
pub mod relations;
pub mod schema;
pub mod stats;

pub use compare::{compare_documents, Comparison};
pub use config::AnalyzerConfig;
pub use engine::AnalyzerEngine;
pub use error::{AnalyzerError, Result};
pub use fingerprint::{complexity, Fingerprint};
pub use graph::RelationGraph;
pub use infer::infer;
pub use library::{Document, DocumentDraft, DocumentKind, DocumentLibrary, DocumentRepository, DocumentStatus};
pub use optimize::{OptimizationDetector, OptimizationSuggestion, Severity, SuggestionKind};
pub use relations::{similarity, Relationship, RelationshipKind};
pub use schema::{Schema, SchemaNode, ValueKind};
pub use stats::LibraryStats;
