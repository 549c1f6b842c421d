//! lexeval-cli: command-line evaluation driver and HTTP search service.
//!
//! Core pipeline logic lives in `lexeval-core`.

/// HTTP search service: Axum router, handlers, models, metrics.
pub mod api;
/// Client for an external search endpoint with bounded retries.
pub mod remote;
/// TOML settings file.
pub mod settings;

use lexeval_core::retrieval::Retriever;
use lexeval_core::storage::{load_corpus, load_lemma_dictionary, load_synonyms_or_empty};
use lexeval_core::text::{LemmaDictionary, LemmaOracle, Normalizer};
use lexeval_core::{Error, PipelineConfig, Result};
use settings::DataPaths;
use std::sync::Arc;

/// Load the corpus, synonym table and lemma dictionary named in `paths`.
///
/// The corpus is required; a missing table means no expansion and a missing
/// dictionary makes lemma mode behave like `none`.
pub fn load_retriever(paths: &DataPaths, config: PipelineConfig) -> Result<Retriever> {
    config.validate()?;
    let corpus_path = paths.corpus.as_deref().ok_or_else(|| {
        Error::InvalidConfig("no corpus file given (--corpus or [paths] corpus)".into())
    })?;
    let corpus = load_corpus(corpus_path)?;
    let synonyms = load_synonyms_or_empty(paths.synonyms.as_deref(), config.synonym_top_n)?;
    let oracle: Arc<dyn LemmaOracle> = match paths.lemmas.as_deref() {
        Some(p) => Arc::new(load_lemma_dictionary(p)?),
        None => Arc::new(LemmaDictionary::empty()),
    };
    let normalizer = Normalizer::new(oracle, config.lemma_threshold);
    Ok(Retriever::new(
        Arc::new(corpus),
        Arc::new(synonyms),
        normalizer,
        config,
    ))
}
