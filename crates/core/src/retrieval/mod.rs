//! Retrieval: field policies, Boolean and weighted retrievers, TF-IDF.

/// Matchable fields and field-sets.
pub mod field;
/// Per-field match policies.
pub mod matcher;
/// Boolean and weighted retrieval over the corpus.
pub mod retriever;
/// TF-IDF cosine retrieval.
pub mod tfidf;

pub use field::{Field, FieldSet};
pub use retriever::Retriever;
pub use tfidf::TfIdfIndex;

use serde::{Deserialize, Serialize};

/// A document id with its retrieval score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredId {
    pub id: String,
    pub score: f64,
}

impl ScoredId {
    pub fn new(id: impl Into<String>, score: f64) -> Self {
        Self {
            id: id.into(),
            score,
        }
    }
}

/// Sort by descending score. The sort is stable, so equal scores keep the
/// order they were produced in (corpus order for every retriever).
pub(crate) fn rank(results: &mut [ScoredId]) {
    results.sort_by(|a, b| b.score.total_cmp(&a.score));
}
