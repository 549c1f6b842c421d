//! Term normalization under a selectable mode.

use crate::config::LEMMA_CONFIDENCE_THRESHOLD;
use crate::error::{Error, Result};
use crate::text::lemma::{LemmaDictionary, LemmaOracle};
use rust_stemmers::{Algorithm, Stemmer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Policy for canonicalizing a term before matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormMode {
    /// Lowercase only.
    None,
    /// Lowercase, then Snowball English stemming.
    Stem,
    /// Lowercase, then the oracle's lemma when it is confident enough.
    Lemma,
}

impl NormMode {
    /// Mode name as accepted by [`FromStr`].
    pub fn as_str(&self) -> &'static str {
        match self {
            NormMode::None => "none",
            NormMode::Stem => "stem",
            NormMode::Lemma => "lemma",
        }
    }
}

impl fmt::Display for NormMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NormMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "none" => Ok(NormMode::None),
            "stem" => Ok(NormMode::Stem),
            "lemma" => Ok(NormMode::Lemma),
            other => Err(Error::InvalidMode(other.to_string())),
        }
    }
}

/// Maps single terms to their canonical form.
///
/// Multi-word terms are treated as one token in every mode: the stemmer only
/// strips the trailing suffix and the oracle is asked about the whole string.
#[derive(Clone)]
pub struct Normalizer {
    stemmer: Arc<Stemmer>,
    oracle: Arc<dyn LemmaOracle>,
    lemma_threshold: f64,
}

impl fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Normalizer")
            .field("lemma_threshold", &self.lemma_threshold)
            .finish_non_exhaustive()
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(Arc::new(LemmaDictionary::empty()), LEMMA_CONFIDENCE_THRESHOLD)
    }
}

impl Normalizer {
    /// Creates a normalizer consulting `oracle` in lemma mode.
    pub fn new(oracle: Arc<dyn LemmaOracle>, lemma_threshold: f64) -> Self {
        Self {
            stemmer: Arc::new(Stemmer::create(Algorithm::English)),
            oracle,
            lemma_threshold,
        }
    }

    /// Confidence a lemma must exceed to be accepted.
    pub fn lemma_threshold(&self) -> f64 {
        self.lemma_threshold
    }

    /// Canonical form of `term` under `mode`.
    pub fn normalize(&self, term: &str, mode: NormMode) -> String {
        let lowered = term.to_lowercase();
        match mode {
            NormMode::None => lowered,
            NormMode::Stem => self.stemmer.stem(&lowered).into_owned(),
            NormMode::Lemma => match self.oracle.top_candidate(term) {
                Some(candidate) if candidate.score > self.lemma_threshold => {
                    candidate.normal_form.to_lowercase()
                }
                _ => lowered,
            },
        }
    }

    /// Parses `mode` and normalizes `term`; fails fast on an unknown mode.
    pub fn normalize_str(&self, term: &str, mode: &str) -> Result<String> {
        let mode: NormMode = mode.parse()?;
        Ok(self.normalize(term, mode))
    }
}
