//! Query expansion: the synonym table and the expander that reads it.

/// Whole-query expansion into weighted terms.
pub mod expander;
/// Read-only term-similarity table.
pub mod synonyms;

pub use expander::{expand_query, original_term, WeightedTerm};
pub use synonyms::{SimilarTerm, SynonymTable};
