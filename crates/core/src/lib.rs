//! # lexeval-core
//!
//! Lexical search and retrieval evaluation over an in-memory corpus of
//! scholarly documents: normalization, synonym expansion, field matching,
//! Boolean, weighted and TF-IDF retrieval, synthesized ground truth and
//! precision/recall/F1 experiments.
//!
//! This is the core library crate with zero async dependencies. The CLI and
//! HTTP search service live in `lexeval-cli`.

/// Policy constants and the runtime `PipelineConfig`.
pub mod config;
/// Core document types: `Document` and its case-folded view.
pub mod document;
/// Crate-wide error type.
pub mod error;
/// Ground truth, metrics, experiment driver and summary.
pub mod eval;
/// Synonym table and query expansion.
pub mod expansion;
/// Field policies and the Boolean, weighted and TF-IDF retrievers.
pub mod retrieval;
/// In-memory corpus and JSON loaders.
pub mod storage;
/// Tokenizer, lemma oracle and term normalizer.
pub mod text;

pub use config::PipelineConfig;
pub use error::{Error, Result};
