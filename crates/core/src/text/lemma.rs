//! Lemmatization capability.
//!
//! The pipeline only needs "map a raw token to a canonical form, with a
//! confidence score". [`LemmaOracle`] is that seam; [`LemmaDictionary`] is the
//! bundled implementation, backed by a precomputed `word -> candidates` table.

use std::collections::HashMap;

/// Best analysis of a term proposed by a [`LemmaOracle`].
#[derive(Debug, Clone, PartialEq)]
pub struct LemmaCandidate {
    /// Canonical (dictionary) form of the term.
    pub normal_form: String,
    /// Oracle confidence in `[0, 1]`.
    pub score: f64,
}

impl LemmaCandidate {
    /// Creates a candidate.
    pub fn new(normal_form: impl Into<String>, score: f64) -> Self {
        Self {
            normal_form: normal_form.into(),
            score,
        }
    }
}

/// A source of lemma candidates.
pub trait LemmaOracle: Send + Sync {
    /// Top-ranked candidate for `term`, or `None` if the oracle has no analysis.
    fn top_candidate(&self, term: &str) -> Option<LemmaCandidate>;
}

/// Dictionary-backed oracle. Keys are matched case-insensitively.
#[derive(Debug, Default, Clone)]
pub struct LemmaDictionary {
    entries: HashMap<String, Vec<LemmaCandidate>>,
}

impl LemmaDictionary {
    /// An oracle that knows no words: lemma mode then behaves like `none`.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a dictionary from `(word, candidates)` pairs.
    ///
    /// Candidates keep their given order; the first one is the top candidate.
    /// When two words fold to the same key the first pair wins.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<LemmaCandidate>)>,
    {
        let mut map = HashMap::new();
        for (word, candidates) in entries {
            if candidates.is_empty() {
                continue;
            }
            map.entry(word.to_lowercase()).or_insert(candidates);
        }
        Self { entries: map }
    }

    /// Number of words with at least one candidate.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the dictionary has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl LemmaOracle for LemmaDictionary {
    fn top_candidate(&self, term: &str) -> Option<LemmaCandidate> {
        self.entries
            .get(&term.to_lowercase())
            .and_then(|c| c.first())
            .cloned()
    }
}
