//! Synthesized relevance judgments.
//!
//! A document is relevant to a query when any term of the query's expansion
//! matches its title, abstract or tags. The oracle always expands and never
//! stems or lemmatizes, whatever the mode under evaluation, so every mode is
//! scored against the same set.

use crate::expansion::{expand_query, SynonymTable};
use crate::retrieval::{matcher, Field};
use crate::storage::Corpus;
use std::collections::HashSet;

/// Ids of the documents considered relevant to `query`.
pub fn ground_truth(
    corpus: &Corpus,
    table: &SynonymTable,
    query: &str,
    weight_threshold: f64,
) -> HashSet<String> {
    // expansion output is already lowercase, which is all `none` does
    let terms: Vec<String> = expand_query(query, table, weight_threshold)
        .into_iter()
        .map(|t| t.term)
        .filter(|t| !t.is_empty())
        .collect();
    if terms.is_empty() {
        return HashSet::new();
    }
    corpus
        .iter()
        .filter(|(_, folded)| Field::ALL.iter().any(|&f| matcher::matches(folded, &terms, f)))
        .map(|(doc, _)| doc.id.clone())
        .collect()
}
