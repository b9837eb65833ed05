//! Document library
//!
//! In-memory repository for the JSON documents the engine analyzes. The
//! library owns document identity, text content, and explicit relations;
//! derived artifacts (schemas, suggestions, comparisons) live in the engine
//! and never flow back into document content.

use chrono::{DateTime, Utc};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

use crate::error::Result;

/// Whether a document is a reusable template or concrete data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// Schema template meant to be referenced by instances
    Class,
    /// Concrete data document
    Instance,
}

/// Lifecycle status used by view layers for dirty indicators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    New,
    Modified,
    Saved,
}

/// One JSON text artifact tracked by the library
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique identifier, assigned by the library
    pub id: String,
    pub name: String,
    pub kind: DocumentKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Raw text content; expected (not required) to parse as JSON
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Identifiers of explicitly related documents
    pub related_ids: Vec<String>,
    pub tags: Vec<String>,
    pub status: DocumentStatus,
}

impl Document {
    /// Strictly parse the content as JSON
    pub fn parsed(&self) -> Result<Value> {
        Ok(serde_json::from_str(&self.content)?)
    }
}

/// A document to be added to the library
#[derive(Debug, Clone)]
pub struct DocumentDraft {
    pub name: String,
    pub kind: DocumentKind,
    pub description: Option<String>,
    pub content: String,
    pub tags: Vec<String>,
}

impl DocumentDraft {
    pub fn new(name: impl Into<String>, kind: DocumentKind, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            description: None,
            content: content.into(),
            tags: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}

/// Read access to documents, isolating callers from the storage shape
pub trait DocumentRepository {
    /// Look up one document by id
    fn get(&self, id: &str) -> Option<&Document>;

    /// All documents, ordered by creation time then id
    fn all(&self) -> Vec<&Document>;

    fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }
}

/// The in-memory document library
#[derive(Debug, Default)]
pub struct DocumentLibrary {
    documents: HashMap<String, Document>,
    next_id: u64,
}

impl DocumentLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document, assigning its id and timestamps
    pub fn add(&mut self, draft: DocumentDraft) -> String {
        self.next_id += 1;
        let id = format!("json_{}", self.next_id);
        let now = Utc::now();
        let document = Document {
            id: id.clone(),
            name: draft.name,
            kind: draft.kind,
            description: draft.description,
            content: draft.content,
            created_at: now,
            updated_at: now,
            related_ids: Vec::new(),
            tags: draft.tags,
            status: DocumentStatus::New,
        };
        self.documents.insert(id.clone(), document);
        id
    }

    /// Load a JSON file from disk as an instance document
    ///
    /// The file must parse as JSON; the name is taken from the file stem.
    pub fn add_from_file(&mut self, path: impl AsRef<Path>) -> Result<String> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str::<Value>(&content)?;

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("document")
            .to_string();
        Ok(self.add(DocumentDraft::new(name, DocumentKind::Instance, content)))
    }

    /// Replace a document's content, marking it modified
    pub fn update_content(&mut self, id: &str, content: impl Into<String>) -> bool {
        match self.documents.get_mut(id) {
            Some(document) => {
                document.content = content.into();
                document.status = DocumentStatus::Modified;
                document.updated_at = Utc::now();
                true
            }
            None => false,
        }
    }

    /// Rename a document, marking it modified
    pub fn rename(&mut self, id: &str, name: impl Into<String>) -> bool {
        match self.documents.get_mut(id) {
            Some(document) => {
                document.name = name.into();
                document.status = DocumentStatus::Modified;
                document.updated_at = Utc::now();
                true
            }
            None => false,
        }
    }

    /// Mark a document as saved
    pub fn mark_saved(&mut self, id: &str) -> bool {
        match self.documents.get_mut(id) {
            Some(document) => {
                document.status = DocumentStatus::Saved;
                document.updated_at = Utc::now();
                true
            }
            None => false,
        }
    }

    /// Remove a document and strip it from every relation list
    pub fn remove(&mut self, id: &str) -> Option<Document> {
        let removed = self.documents.remove(id)?;
        for document in self.documents.values_mut() {
            document.related_ids.retain(|rid| rid != id);
        }
        Some(removed)
    }

    /// Record a directed relation between two existing documents
    ///
    /// Self-relations, duplicates, and unknown ids are ignored.
    pub fn add_relation(&mut self, source_id: &str, target_id: &str) -> bool {
        if source_id == target_id || !self.documents.contains_key(target_id) {
            return false;
        }
        match self.documents.get_mut(source_id) {
            Some(source) if !source.related_ids.contains(&target_id.to_string()) => {
                source.related_ids.push(target_id.to_string());
                true
            }
            _ => false,
        }
    }

    /// Remove a directed relation
    pub fn remove_relation(&mut self, source_id: &str, target_id: &str) -> bool {
        match self.documents.get_mut(source_id) {
            Some(source) => {
                let before = source.related_ids.len();
                source.related_ids.retain(|rid| rid != target_id);
                source.related_ids.len() != before
            }
            None => false,
        }
    }

    /// Resolve a document's explicit relations, skipping dangling ids
    pub fn related_documents(&self, id: &str) -> Vec<&Document> {
        self.documents
            .get(id)
            .map(|document| {
                document
                    .related_ids
                    .iter()
                    .filter_map(|rid| self.documents.get(rid))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Fuzzy-search documents by name and description, best matches first
    pub fn search(&self, query: &str) -> Vec<&Document> {
        let matcher = SkimMatcherV2::default();
        let mut scored: Vec<(i64, &Document)> = Vec::new();

        for document in self.documents.values() {
            let name_score = matcher.fuzzy_match(&document.name, query);
            let description_score = document
                .description
                .as_deref()
                .and_then(|d| matcher.fuzzy_match(d, query));
            if let Some(score) = name_score.max(description_score) {
                scored.push((score, document));
            }
        }

        scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.id.cmp(&b.1.id)));
        scored.into_iter().map(|(_, document)| document).collect()
    }

    /// All documents of one kind
    pub fn of_kind(&self, kind: DocumentKind) -> Vec<&Document> {
        self.all()
            .into_iter()
            .filter(|document| document.kind == kind)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Drop every document
    pub fn clear(&mut self) {
        self.documents.clear();
    }
}

impl DocumentRepository for DocumentLibrary {
    fn get(&self, id: &str) -> Option<&Document> {
        self.documents.get(id)
    }

    fn all(&self) -> Vec<&Document> {
        let mut documents: Vec<&Document> = self.documents.values().collect();
        documents.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        documents
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library_with(names: &[&str]) -> (DocumentLibrary, Vec<String>) {
        let mut library = DocumentLibrary::new();
        let ids = names
            .iter()
            .map(|name| library.add(DocumentDraft::new(*name, DocumentKind::Instance, "{}")))
            .collect();
        (library, ids)
    }

    #[test]
    fn test_add_assigns_ids_and_status() {
        let (library, ids) = library_with(&["first", "second"]);
        assert_eq!(library.len(), 2);
        let first = library.get(&ids[0]).unwrap();
        assert_eq!(first.status, DocumentStatus::New);
        assert_eq!(first.name, "first");
        assert_ne!(ids[0], ids[1]);
    }

    #[test]
    fn test_update_marks_modified_and_save_resets() {
        let (mut library, ids) = library_with(&["doc"]);
        assert!(library.update_content(&ids[0], r#"{"a":1}"#));
        assert_eq!(library.get(&ids[0]).unwrap().status, DocumentStatus::Modified);
        assert!(library.mark_saved(&ids[0]));
        assert_eq!(library.get(&ids[0]).unwrap().status, DocumentStatus::Saved);
        assert!(!library.update_content("missing", "{}"));
    }

    #[test]
    fn test_relations_ignore_self_duplicates_and_unknown() {
        let (mut library, ids) = library_with(&["a", "b"]);
        assert!(library.add_relation(&ids[0], &ids[1]));
        assert!(!library.add_relation(&ids[0], &ids[1]));
        assert!(!library.add_relation(&ids[0], &ids[0]));
        assert!(!library.add_relation(&ids[0], "missing"));
        assert_eq!(library.related_documents(&ids[0]).len(), 1);
    }

    #[test]
    fn test_remove_strips_dangling_relations() {
        let (mut library, ids) = library_with(&["a", "b"]);
        library.add_relation(&ids[0], &ids[1]);
        assert!(library.remove(&ids[1]).is_some());
        assert!(library.get(&ids[0]).unwrap().related_ids.is_empty());
    }

    #[test]
    fn test_search_ranks_better_matches_first() {
        let mut library = DocumentLibrary::new();
        library.add(DocumentDraft::new("user-profile", DocumentKind::Class, "{}"));
        library.add(
            DocumentDraft::new("orders", DocumentKind::Instance, "{}")
                .with_description("per-user order history"),
        );
        library.add(DocumentDraft::new("settings", DocumentKind::Instance, "{}"));

        let results = library.search("user");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].name, "user-profile");
    }

    #[test]
    fn test_of_kind_filters() {
        let mut library = DocumentLibrary::new();
        library.add(DocumentDraft::new("template", DocumentKind::Class, "{}"));
        library.add(DocumentDraft::new("data", DocumentKind::Instance, "{}"));
        assert_eq!(library.of_kind(DocumentKind::Class).len(), 1);
        assert_eq!(library.of_kind(DocumentKind::Instance).len(), 1);
    }

    #[test]
    fn test_add_from_file_rejects_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.json");
        let bad = dir.path().join("bad.json");
        std::fs::write(&good, r#"{"ok": true}"#).unwrap();
        std::fs::write(&bad, "{not valid").unwrap();

        let mut library = DocumentLibrary::new();
        let id = library.add_from_file(&good).unwrap();
        assert_eq!(library.get(&id).unwrap().name, "good");
        assert!(library.add_from_file(&bad).is_err());
        assert_eq!(library.len(), 1);
    }

    #[test]
    fn test_parsed_rejects_invalid_content() {
        let (mut library, ids) = library_with(&["doc"]);
        library.update_content(&ids[0], "{broken");
        assert!(library.get(&ids[0]).unwrap().parsed().is_err());
    }
}
