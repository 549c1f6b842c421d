//! TF-IDF cosine retrieval.
//!
//! Each document is vectorized from `title abstract tags...` with raw term
//! counts and the smoothed IDF `ln((1 + N) / (1 + df)) + 1`, then scaled to
//! unit length. The query is vectorized the same way against the fitted
//! vocabulary (unknown query terms are ignored), so cosine similarity is the
//! dot product of the two unit vectors.
//!
//! Weights are stored per term as postings, so a query only touches the
//! documents sharing at least one term with it.

use crate::retrieval::{rank, ScoredId};
use crate::storage::Corpus;
use crate::text::tokenize;
use std::collections::HashMap;

/// A term's normalized weight in one document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Posting {
    /// Corpus position of the document.
    pub doc: u32,
    /// `tf * idf / ||doc||`.
    pub weight: f64,
}

#[derive(Debug, Clone, Default)]
struct TermEntry {
    idf: f64,
    postings: Vec<Posting>,
}

/// A TF-IDF index fitted on one corpus.
#[derive(Debug, Clone, Default)]
pub struct TfIdfIndex {
    vocabulary: HashMap<String, TermEntry>,
    ids: Vec<String>,
}

/// Raw term counts, in first-occurrence order so sums are reproducible.
fn term_counts(text: &str) -> Vec<(String, u32)> {
    let tokens = tokenize(text);
    let mut order: Vec<(String, u32)> = Vec::new();
    let mut position: HashMap<&str, usize> = HashMap::new();
    for token in tokens.iter() {
        match position.get(token) {
            Some(&i) => order[i].1 += 1,
            None => {
                position.insert(token, order.len());
                order.push((token.to_string(), 1));
            }
        }
    }
    order
}

impl TfIdfIndex {
    /// Fit the vocabulary and document vectors over `corpus`.
    pub fn build(corpus: &Corpus) -> Self {
        let n = corpus.len();
        let counts: Vec<Vec<(String, u32)>> = corpus
            .iter()
            .map(|(doc, _)| term_counts(&doc.full_text()))
            .collect();

        let mut df: HashMap<&str, u32> = HashMap::new();
        for doc_terms in &counts {
            for (term, _) in doc_terms {
                *df.entry(term.as_str()).or_insert(0) += 1;
            }
        }
        let idf: HashMap<&str, f64> = df
            .iter()
            .map(|(&term, &d)| (term, smoothed_idf(n, d as usize)))
            .collect();

        let mut vocabulary: HashMap<String, TermEntry> = HashMap::with_capacity(idf.len());
        for (doc, doc_terms) in counts.iter().enumerate() {
            let weights: Vec<f64> = doc_terms
                .iter()
                .map(|(term, tf)| *tf as f64 * idf[term.as_str()])
                .collect();
            let norm = weights.iter().map(|w| w * w).sum::<f64>().sqrt();
            if norm == 0.0 {
                continue;
            }
            for ((term, _), w) in doc_terms.iter().zip(weights) {
                let entry = vocabulary.entry(term.clone()).or_insert_with(|| TermEntry {
                    idf: idf[term.as_str()],
                    postings: Vec::new(),
                });
                entry.postings.push(Posting {
                    doc: doc as u32,
                    weight: w / norm,
                });
            }
        }

        tracing::debug!(documents = n, terms = vocabulary.len(), "Fitted TF-IDF index");
        Self {
            vocabulary,
            ids: corpus.ids().map(str::to_string).collect(),
        }
    }

    /// Number of indexed documents.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns `true` if no documents were indexed.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Number of distinct terms in the fitted vocabulary.
    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    /// Smoothed IDF of `term`, if it is in the vocabulary.
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.vocabulary.get(term).map(|e| e.idf)
    }

    /// Rank every document with cosine similarity `> 0` to `query`.
    ///
    /// Descending by similarity; equal similarities keep corpus order.
    pub fn search(&self, query: &str) -> Vec<ScoredId> {
        let query_vec: Vec<(&TermEntry, f64)> = term_counts(query)
            .into_iter()
            .filter_map(|(term, tf)| {
                self.vocabulary
                    .get(&term)
                    .map(|entry| (entry, tf as f64 * entry.idf))
            })
            .collect();
        let norm = query_vec.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm == 0.0 {
            return Vec::new();
        }

        let mut scores = vec![0.0f64; self.ids.len()];
        for (entry, w) in &query_vec {
            let q = w / norm;
            for posting in &entry.postings {
                scores[posting.doc as usize] += q * posting.weight;
            }
        }

        let mut results: Vec<ScoredId> = scores
            .into_iter()
            .enumerate()
            .filter(|&(_, s)| s > 0.0)
            .map(|(doc, score)| ScoredId::new(self.ids[doc].clone(), score))
            .collect();
        rank(&mut results);
        results
    }
}

/// `ln((1 + n) / (1 + df)) + 1`.
fn smoothed_idf(n: usize, df: usize) -> f64 {
    ((1.0 + n as f64) / (1.0 + df as f64)).ln() + 1.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    fn tags(t: &[&str]) -> Vec<String> {
        t.iter().map(|s| s.to_string()).collect()
    }

    fn build_corpus() -> Corpus {
        Corpus::new([
            Document::new("0", "Rust programming", "systems language", tags(&["fast"])),
            Document::new("1", "Python programming", "scripting language", tags(&["easy"])),
            Document::new("2", "Cooking", "pasta and sauce", tags(&[])),
            Document::new("3", "Rust rust rust", "memory safety", tags(&["rust"])),
        ])
    }

    #[test]
    fn test_idf_smoothing() {
        let idx = TfIdfIndex::build(&build_corpus());
        // "programming" occurs in 2 of 4 documents
        let expected = (5.0f64 / 3.0).ln() + 1.0;
        assert!((idx.idf("programming").unwrap() - expected).abs() < 1e-12);
        // one-character tokens never enter the vocabulary
        assert!(idx.idf("a").is_none());
    }

    #[test]
    fn test_document_vectors_are_unit_length() {
        let idx = TfIdfIndex::build(&build_corpus());
        let mut norms = vec![0.0f64; idx.len()];
        for entry in idx.vocabulary.values() {
            for p in &entry.postings {
                norms[p.doc as usize] += p.weight * p.weight;
            }
        }
        for n in norms {
            assert!((n - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_search_positive_descending() {
        let idx = TfIdfIndex::build(&build_corpus());
        let results = idx.search("rust");
        let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "0"], "higher term frequency ranks first");
        assert!(results.iter().all(|r| r.score > 0.0 && r.score <= 1.0 + 1e-9));
    }

    #[test]
    fn test_identical_document_scores_one() {
        let corpus = Corpus::new([
            Document::new("a", "graph neural networks", "", vec![]),
            Document::new("b", "protein folding", "", vec![]),
        ]);
        let idx = TfIdfIndex::build(&corpus);
        let results = idx.search("Graph Neural Networks");
        assert_eq!(results.len(), 1);
        assert!((results[0].score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_ties_keep_corpus_order() {
        let corpus = Corpus::new([
            Document::new("z", "vision", "", vec![]),
            Document::new("y", "audio", "", vec![]),
            Document::new("x", "vision", "", vec![]),
        ]);
        let results = TfIdfIndex::build(&corpus).search("vision");
        let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["z", "x"]);
    }

    #[test]
    fn test_unknown_or_empty_query() {
        let idx = TfIdfIndex::build(&build_corpus());
        assert!(idx.search("quantum").is_empty());
        assert!(idx.search("").is_empty());
        assert!(idx.search("a").is_empty());
        assert!(TfIdfIndex::build(&Corpus::default()).search("rust").is_empty());
    }
}
