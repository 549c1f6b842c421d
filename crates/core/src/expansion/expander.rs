//! Query expansion against a [`SynonymTable`].

use crate::expansion::synonyms::SynonymTable;
use serde::{Deserialize, Serialize};

/// A term with the weight it contributes to scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedTerm {
    /// Term text.
    pub term: String,
    /// 1.0 for the original query, the table weight for synonyms.
    pub weight: f64,
}

impl WeightedTerm {
    /// Creates a weighted term.
    pub fn new(term: impl Into<String>, weight: f64) -> Self {
        Self {
            term: term.into(),
            weight,
        }
    }
}

/// The unexpanded query: `[(lowercase(query), 1.0)]`.
pub fn original_term(query: &str) -> Vec<WeightedTerm> {
    vec![WeightedTerm::new(query.to_lowercase(), 1.0)]
}

/// Expand `query` with the table entry keyed by the whole query string.
///
/// The first element is always `(lowercase(query), 1.0)`. Synonyms with
/// `weight >= weight_threshold` follow in table order, lowercased. A query
/// with no exact (case-folded) key, including any multi-word query the table
/// was not built with, is returned unexpanded. Terms are not deduplicated.
pub fn expand_query(query: &str, table: &SynonymTable, weight_threshold: f64) -> Vec<WeightedTerm> {
    let mut out = original_term(query);
    if let Some(similar) = table.get(query) {
        out.extend(
            similar
                .iter()
                .filter(|s| s.weight >= weight_threshold)
                .map(|s| WeightedTerm::new(s.term.to_lowercase(), s.weight)),
        );
    }
    out
}
