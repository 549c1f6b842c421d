//! Storage layer: the in-memory corpus and the JSON loaders that fill it.
//!
//! Everything is read fully into memory before any query runs. Nothing is
//! written back.

/// Ordered, immutable document collection.
pub mod corpus;
/// JSON loaders for the corpus, synonym table, lemma dictionary and queries.
pub mod loader;
/// Lemmatized copy of the corpus for lemma-mode weighted search.
pub mod normalized;

pub use corpus::Corpus;
pub use loader::{
    corpus_from_value, lemmas_from_value, load_corpus, load_lemma_dictionary, load_queries,
    load_synonyms, load_synonyms_or_empty, synonyms_from_value,
};
pub use normalized::{lemmatize_corpus, lemmatize_document, lemmatize_text};
