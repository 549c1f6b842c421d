//! In-memory document collection.
//!
//! The corpus is loaded fully before any query runs and is never mutated
//! afterwards. Load order is preserved and is the tie-break order for every
//! retriever.

use crate::document::{Document, FoldedFields};
use std::collections::HashMap;
use std::sync::Arc;

/// An immutable, ordered set of documents with their folded views.
#[derive(Debug, Default, Clone)]
pub struct Corpus {
    documents: Vec<Arc<Document>>,
    folded: Vec<FoldedFields>,
    id_to_index: HashMap<String, usize>,
}

impl Corpus {
    /// Builds a corpus, skipping documents with an empty or repeated id.
    pub fn new(documents: impl IntoIterator<Item = Document>) -> Self {
        let mut corpus = Self::default();
        for doc in documents {
            if doc.id.trim().is_empty() {
                tracing::warn!(title = %doc.title, "skipping document with empty id");
                continue;
            }
            if corpus.id_to_index.contains_key(&doc.id) {
                tracing::warn!(id = %doc.id, "skipping document with duplicate id");
                continue;
            }
            corpus
                .id_to_index
                .insert(doc.id.clone(), corpus.documents.len());
            corpus.folded.push(doc.fold());
            corpus.documents.push(Arc::new(doc));
        }
        corpus
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns `true` if the corpus holds no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Document with identifier `id`.
    pub fn get(&self, id: &str) -> Option<&Arc<Document>> {
        self.id_to_index.get(id).map(|&i| &self.documents[i])
    }

    /// Iterates documents with their folded fields, in load order.
    pub fn iter(&self) -> impl Iterator<Item = (&Arc<Document>, &FoldedFields)> + '_ {
        self.documents.iter().zip(self.folded.iter())
    }

    /// Iterates document identifiers in load order.
    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.documents.iter().map(|d| d.id.as_str())
    }
}
