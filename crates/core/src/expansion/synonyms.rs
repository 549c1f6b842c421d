//! Precomputed term-similarity ("synonym") table.
//!
//! Built by an external job and loaded read-only. Each canonical key maps to
//! at most `top_n` similar terms ordered by descending weight.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;

/// One similar term and its similarity weight in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarTerm {
    /// Similar term, as stored in the table.
    pub term: String,
    /// Similarity weight.
    pub weight: f64,
}

impl SimilarTerm {
    /// Creates an entry.
    pub fn new(term: impl Into<String>, weight: f64) -> Self {
        Self {
            term: term.into(),
            weight,
        }
    }
}

/// Mapping `lowercased term -> similar terms`, in source key order.
#[derive(Debug, Default, Clone)]
pub struct SynonymTable {
    keys: HashMap<String, usize>,
    entries: Vec<(String, Vec<SimilarTerm>)>,
}

impl SynonymTable {
    /// A table with no entries: expansion becomes the identity.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a table from raw `(key, similar terms)` pairs in source order.
    ///
    /// Keys are case-folded and the first occurrence of a folded key wins.
    /// The key's own entry is removed from its list, weights outside `[0, 1]`
    /// are dropped, lists are stably sorted by descending weight and cut to
    /// `top_n`. Keys left with an empty list are still present.
    pub fn from_entries<I>(entries: I, top_n: usize) -> Self
    where
        I: IntoIterator<Item = (String, Vec<SimilarTerm>)>,
    {
        let mut table = Self::default();
        for (raw_key, similar) in entries {
            let key = raw_key.to_lowercase();
            if table.keys.contains_key(&key) {
                tracing::debug!(key = %raw_key, "duplicate synonym key after case folding, keeping first");
                continue;
            }

            let mut kept: Vec<SimilarTerm> = similar
                .into_iter()
                .filter(|s| {
                    let valid = s.weight.is_finite() && (0.0..=1.0).contains(&s.weight);
                    if !valid {
                        tracing::warn!(key = %raw_key, term = %s.term, weight = s.weight, "dropping synonym with out-of-range weight");
                    }
                    valid && s.term.to_lowercase() != key
                })
                .collect();
            kept.sort_by(|a, b| b.weight.total_cmp(&a.weight));
            kept.truncate(top_n);

            table.keys.insert(key.clone(), table.entries.len());
            table.entries.push((key, kept));
        }
        table
    }

    /// Similar terms for `query`, looked up case-insensitively as a whole string.
    pub fn get(&self, query: &str) -> Option<&[SimilarTerm]> {
        self.keys
            .get(&query.to_lowercase())
            .map(|&i| self.entries[i].1.as_slice())
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates `(key, similar terms)` in source order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[SimilarTerm])> + '_ {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl Serialize for SynonymTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, similar) in &self.entries {
            map.serialize_entry(key, similar)?;
        }
        map.end()
    }
}
