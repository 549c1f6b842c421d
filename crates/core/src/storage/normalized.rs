//! Lemmatized copy of the corpus.
//!
//! Each field is lowercased, stripped of everything except word characters,
//! whitespace and hyphens, split on whitespace, and every word replaced by
//! its lemma when the oracle is confident enough (`score > lemma_threshold`).
//! Lemma-mode queries in the weighted search are matched against this view,
//! so a query and a document that inflect the same word meet on the lemma.

use crate::document::Document;
use crate::storage::Corpus;
use crate::text::{NormMode, Normalizer};

fn keep_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-' || c.is_whitespace()
}

/// Lemmatizes `text` word by word and rejoins with single spaces.
pub fn lemmatize_text(text: &str, normalizer: &Normalizer) -> String {
    let cleaned: String = text.to_lowercase().chars().filter(|&c| keep_char(c)).collect();
    cleaned
        .split_whitespace()
        .map(|word| normalizer.normalize(word, NormMode::Lemma))
        .collect::<Vec<_>>()
        .join(" ")
}

/// A copy of `doc` with title, abstract and every tag lemmatized.
/// Id and metadata are kept as they are.
pub fn lemmatize_document(doc: &Document, normalizer: &Normalizer) -> Document {
    Document {
        id: doc.id.clone(),
        title: lemmatize_text(&doc.title, normalizer),
        abstract_text: lemmatize_text(&doc.abstract_text, normalizer),
        tags: doc
            .tags
            .iter()
            .map(|t| lemmatize_text(t, normalizer))
            .collect(),
        categories: doc.categories.clone(),
        author: doc.author.clone(),
        date: doc.date.clone(),
    }
}

/// Lemmatized view of `corpus`, same ids in the same order.
pub fn lemmatize_corpus(corpus: &Corpus, normalizer: &Normalizer) -> Corpus {
    let view = Corpus::new(
        corpus
            .iter()
            .map(|(doc, _)| lemmatize_document(doc, normalizer)),
    );
    tracing::info!(documents = view.len(), "Built lemmatized corpus view");
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{LemmaCandidate, LemmaDictionary};
    use std::sync::Arc;

    fn normalizer() -> Normalizer {
        let dict = LemmaDictionary::from_entries([
            ("mice".to_string(), vec![LemmaCandidate::new("mouse", 0.9)]),
            ("networks".to_string(), vec![LemmaCandidate::new("network", 0.8)]),
            ("data".to_string(), vec![LemmaCandidate::new("datum", 0.3)]),
        ]);
        Normalizer::new(Arc::new(dict), 0.3)
    }

    #[test]
    fn test_lemmatize_text_word_by_word() {
        let n = normalizer();
        assert_eq!(lemmatize_text("Mice and  Networks.", &n), "mouse and network");
        // score must be strictly above the threshold
        assert_eq!(lemmatize_text("data", &n), "data");
        assert_eq!(lemmatize_text("state-of-the-art (SOTA)!", &n), "state-of-the-art sota");
        assert_eq!(lemmatize_text("  ", &n), "");
    }

    #[test]
    fn test_lemmatize_corpus_keeps_ids_and_order() {
        let corpus = Corpus::new([
            Document::new("b", "Field Mice", "mice in networks", vec!["Mice".into()]),
            Document::new("a", "Other", "", vec![]),
        ]);
        let view = lemmatize_corpus(&corpus, &normalizer());
        assert_eq!(view.ids().collect::<Vec<_>>(), vec!["b", "a"]);
        let doc = view.get("b").unwrap();
        assert_eq!(doc.title, "field mouse");
        assert_eq!(doc.abstract_text, "mouse in network");
        assert_eq!(doc.tags, vec!["mouse".to_string()]);
    }

    #[test]
    fn test_empty_oracle_only_cleans() {
        let doc = Document::new("x", "Deep Nets.", "A study, of graphs", vec!["ML".into()]);
        let out = lemmatize_document(&doc, &Normalizer::default());
        assert_eq!(out.title, "deep nets");
        assert_eq!(out.abstract_text, "a study of graphs");
        assert_eq!(out.tags, vec!["ml".to_string()]);
    }
}
