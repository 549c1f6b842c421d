//! Text processing: tokenization, lemma oracle and term normalization.

/// Lemmatization capability: `LemmaOracle` trait and dictionary implementation.
pub mod lemma;
/// Term normalization under `none`, `stem` and `lemma` modes.
pub mod normalizer;
/// Word tokenizer used by the statistical retriever.
pub mod tokenizer;

pub use lemma::{LemmaCandidate, LemmaDictionary, LemmaOracle};
pub use normalizer::{NormMode, Normalizer};
pub use tokenizer::{tokenize, Tokens};
