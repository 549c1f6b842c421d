//! Policy constants and the runtime pipeline configuration.
//!
//! The constants below are the documented defaults. Pipeline components never read
//! them directly; they receive a [`PipelineConfig`] at construction time so a
//! run can override any of them (CLI flags or a TOML file in `lexeval-cli`).

use crate::error::{Error, Result};
use crate::eval::metrics::LabelConvention;
use crate::retrieval::Field;
use serde::{Deserialize, Serialize};

/// Score contribution of a term found in the title (scored retrieval).
pub const TITLE_WEIGHT: f64 = 3.0;

/// Score contribution of a term found in the abstract (scored retrieval).
pub const ABSTRACT_WEIGHT: f64 = 2.0;

/// Score contribution of a term found in any tag (scored retrieval).
pub const TAGS_WEIGHT: f64 = 1.0;

/// Minimum oracle confidence for a lemma to replace the input term.
///
/// The comparison is strict: a candidate scoring exactly 0.3 is rejected.
pub const LEMMA_CONFIDENCE_THRESHOLD: f64 = 0.3;

/// Minimum similarity weight for a synonym to join an expanded query.
pub const SYNONYM_WEIGHT_THRESHOLD: f64 = 0.2;

/// Maximum number of similar terms kept per synonym-table entry.
pub const SYNONYM_TOP_N: usize = 5;

/// Attempts made against an external search endpoint before giving up.
pub const REMOTE_MAX_ATTEMPTS: u32 = 3;

/// Fixed delay between external endpoint attempts, in milliseconds.
pub const REMOTE_RETRY_DELAY_MS: u64 = 2_000;

/// Per-request timeout against an external search endpoint, in seconds.
pub const REMOTE_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Label of the field-set the summary aggregates over by default.
pub const SUMMARY_FIELD_SET: &str = "[3] Tags + Title + Abstract";

/// Default HTTP port of the search service.
pub const DEFAULT_PORT: u16 = 8000;

/// Default number of hits returned by the search service.
pub const DEFAULT_SEARCH_LIMIT: usize = 50;

/// Maximum number of hits a single search request may ask for.
pub const MAX_SEARCH_LIMIT: usize = 10_000;

/// Per-field weights of the scored retrieval variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldWeights {
    /// Weight of a title hit.
    pub title: f64,
    /// Weight of an abstract hit.
    #[serde(rename = "abstract")]
    pub abstract_text: f64,
    /// Weight of a tag hit.
    pub tags: f64,
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            title: TITLE_WEIGHT,
            abstract_text: ABSTRACT_WEIGHT,
            tags: TAGS_WEIGHT,
        }
    }
}

impl FieldWeights {
    /// Weight applied to a hit in `field`.
    pub fn get(&self, field: Field) -> f64 {
        match field {
            Field::Title => self.title,
            Field::Abstract => self.abstract_text,
            Field::Tags => self.tags,
        }
    }
}

/// Runtime configuration passed into every pipeline component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Field weights for the scored retrieval variant.
    pub weights: FieldWeights,
    /// Lemma candidates must score strictly above this to be used.
    pub lemma_threshold: f64,
    /// Synonyms below this weight are left out of an expansion.
    pub synonym_weight_threshold: f64,
    /// Similar terms kept per synonym-table entry at load time.
    pub synonym_top_n: usize,
    /// Truncate scored results to this many hits (`None` keeps all).
    pub scored_top_k: Option<usize>,
    /// Label-vector convention used by the evaluator.
    pub label_convention: LabelConvention,
    /// Field-set label the summary aggregates over.
    pub summary_field_set: String,
    /// External endpoint attempts before an empty result is assumed.
    pub remote_max_attempts: u32,
    /// Delay between external endpoint attempts, in milliseconds.
    pub remote_retry_delay_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            weights: FieldWeights::default(),
            lemma_threshold: LEMMA_CONFIDENCE_THRESHOLD,
            synonym_weight_threshold: SYNONYM_WEIGHT_THRESHOLD,
            synonym_top_n: SYNONYM_TOP_N,
            scored_top_k: None,
            label_convention: LabelConvention::FullCollection,
            summary_field_set: SUMMARY_FIELD_SET.to_string(),
            remote_max_attempts: REMOTE_MAX_ATTEMPTS,
            remote_retry_delay_ms: REMOTE_RETRY_DELAY_MS,
        }
    }
}

impl PipelineConfig {
    /// Check that thresholds and counts are within their meaningful ranges.
    pub fn validate(&self) -> Result<()> {
        let weights = [
            ("weights.title", self.weights.title),
            ("weights.abstract", self.weights.abstract_text),
            ("weights.tags", self.weights.tags),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be a finite non-negative number, got {value}"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.lemma_threshold) {
            return Err(Error::InvalidConfig(format!(
                "lemma_threshold must be in [0, 1], got {}",
                self.lemma_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.synonym_weight_threshold) {
            return Err(Error::InvalidConfig(format!(
                "synonym_weight_threshold must be in [0, 1], got {}",
                self.synonym_weight_threshold
            )));
        }
        if self.synonym_top_n == 0 {
            return Err(Error::InvalidConfig("synonym_top_n must be > 0".into()));
        }
        if self.scored_top_k == Some(0) {
            return Err(Error::InvalidConfig("scored_top_k must be > 0".into()));
        }
        if self.remote_max_attempts == 0 {
            return Err(Error::InvalidConfig(
                "remote_max_attempts must be > 0".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_policy() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.weights.get(Field::Title), 3.0);
        assert_eq!(cfg.weights.get(Field::Abstract), 2.0);
        assert_eq!(cfg.weights.get(Field::Tags), 1.0);
        assert_eq!(cfg.lemma_threshold, 0.3);
        assert_eq!(cfg.synonym_top_n, 5);
        assert_eq!(cfg.remote_max_attempts, 3);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let cfg: PipelineConfig =
            serde_json::from_str(r#"{"weights": {"title": 5.0}, "lemma_threshold": 0.5}"#)
                .unwrap();
        assert_eq!(cfg.weights.title, 5.0);
        assert_eq!(cfg.weights.abstract_text, 2.0);
        assert_eq!(cfg.lemma_threshold, 0.5);
        assert_eq!(cfg.synonym_weight_threshold, SYNONYM_WEIGHT_THRESHOLD);
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let cfg = PipelineConfig {
            lemma_threshold: 1.5,
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(Error::InvalidConfig(_))));

        let cfg = PipelineConfig {
            synonym_top_n: 0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = PipelineConfig {
            weights: FieldWeights {
                title: f64::NAN,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }
}
