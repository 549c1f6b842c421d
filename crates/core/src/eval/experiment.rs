//! Experiment driver: queries x field-sets x modes.
//!
//! For each query the ground truth is computed once and reused for every
//! field-set and mode. Modes whose retrieval ignores the field-set (scored,
//! TF-IDF, precomputed) are retrieved once per query and evaluated under each
//! field-set label, so every field-set reports the same set of modes.

use crate::error::{Error, Result};
use crate::eval::ground_truth::ground_truth;
use crate::eval::metrics::{evaluate, EvalRecord, LabelConvention};
use crate::eval::summary::{summarize, Summary};
use crate::retrieval::{Field, FieldSet, Retriever, TfIdfIndex};
use crate::text::NormMode;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// Name of the mode every other mode's F1 is compared against.
pub const BASELINE_MODE: &str = "Basic";

/// How a mode produces its retrieved list.
#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    /// Boolean OR match over the field-set.
    Boolean { expand: bool, norm: NormMode },
    /// Weighted field scoring; ids ordered by score.
    Scored { expand: bool, norm: NormMode },
    /// TF-IDF cosine over the full text.
    TfIdf,
    /// Ids per query supplied by the caller, e.g. from an external endpoint.
    Precomputed(HashMap<String, Vec<String>>),
}

/// A named retrieval strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct ModeSpec {
    pub name: String,
    pub strategy: Strategy,
}

impl ModeSpec {
    pub fn new(name: impl Into<String>, strategy: Strategy) -> Self {
        Self {
            name: name.into(),
            strategy,
        }
    }

    /// No expansion, no normalization. The baseline.
    pub fn basic() -> Self {
        Self::new(
            BASELINE_MODE,
            Strategy::Boolean {
                expand: false,
                norm: NormMode::None,
            },
        )
    }

    pub fn synonyms() -> Self {
        Self::new(
            "Synonyms",
            Strategy::Boolean {
                expand: true,
                norm: NormMode::None,
            },
        )
    }

    pub fn syn_lemma() -> Self {
        Self::new(
            "Syn+Lemma",
            Strategy::Boolean {
                expand: true,
                norm: NormMode::Lemma,
            },
        )
    }

    pub fn syn_stem() -> Self {
        Self::new(
            "Syn+Stem",
            Strategy::Boolean {
                expand: true,
                norm: NormMode::Stem,
            },
        )
    }

    /// The weighted variant served by the search endpoint.
    pub fn weighted() -> Self {
        Self::new(
            "Weighted",
            Strategy::Scored {
                expand: true,
                norm: NormMode::Lemma,
            },
        )
    }

    pub fn tfidf() -> Self {
        Self::new("TF-IDF", Strategy::TfIdf)
    }

    /// Results of an external run, keyed by query string.
    pub fn precomputed(name: impl Into<String>, results: HashMap<String, Vec<String>>) -> Self {
        Self::new(name, Strategy::Precomputed(results))
    }

    /// Basic, Synonyms, Syn+Lemma and TF-IDF.
    pub fn defaults() -> Vec<Self> {
        vec![Self::basic(), Self::synonyms(), Self::syn_lemma(), Self::tfidf()]
    }

    /// Every built-in mode.
    pub fn builtins() -> Vec<Self> {
        vec![
            Self::basic(),
            Self::synonyms(),
            Self::syn_lemma(),
            Self::syn_stem(),
            Self::weighted(),
            Self::tfidf(),
        ]
    }

    /// Whether retrieval depends on the field-set.
    pub fn uses_field_set(&self) -> bool {
        matches!(self.strategy, Strategy::Boolean { .. })
    }
}

impl FromStr for ModeSpec {
    type Err = Error;

    /// Looks up a built-in mode by name, ignoring case.
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Self::builtins()
            .into_iter()
            .find(|m| m.name.to_lowercase() == wanted || (wanted == "tfidf" && m.name == "TF-IDF"))
            .ok_or_else(|| Error::InvalidMode(s.to_string()))
    }
}

impl fmt::Display for ModeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A labelled field-set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSetSpec {
    pub label: String,
    pub fields: FieldSet,
}

impl FieldSetSpec {
    pub fn new(label: impl Into<String>, fields: FieldSet) -> Self {
        Self {
            label: label.into(),
            fields,
        }
    }

    /// Tags; tags and title; tags, title and abstract.
    pub fn defaults() -> Vec<Self> {
        let set = |fields: &[Field]| FieldSet::new(fields.iter().copied());
        [
            ("[1] Tags only", set(&[Field::Tags])),
            ("[2] Tags + Title", set(&[Field::Tags, Field::Title])),
            ("[3] Tags + Title + Abstract", set(&Field::ALL)),
        ]
        .into_iter()
        .filter_map(|(label, fields)| fields.ok().map(|f| Self::new(label, f)))
        .collect()
    }
}

/// One mode's outcome on one query and field-set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModeResult {
    pub mode: String,
    /// Number of ids the mode returned.
    pub retrieved: usize,
    #[serde(flatten)]
    pub record: EvalRecord,
}

/// Results of every mode on one field-set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSetReport {
    pub label: String,
    pub results: Vec<ModeResult>,
    /// `f1 - f1(Basic)` per non-baseline mode, in run order.
    #[serde(serialize_with = "serialize_ordered_map")]
    pub delta_f1: Vec<(String, f64)>,
}

fn serialize_ordered_map<S: Serializer>(
    entries: &[(String, f64)],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(entries.len()))?;
    for (k, v) in entries {
        map.serialize_entry(k, v)?;
    }
    map.end()
}

impl FieldSetReport {
    /// Result of `mode`, if it was part of the run.
    pub fn result(&self, mode: &str) -> Option<&ModeResult> {
        self.results.iter().find(|r| r.mode == mode)
    }

    /// F1 delta of `mode` against the baseline, if both were run.
    pub fn delta(&self, mode: &str) -> Option<f64> {
        self.delta_f1.iter().find(|(m, _)| m == mode).map(|(_, d)| *d)
    }
}

/// Everything measured for one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryReport {
    pub query: String,
    pub ground_truth_count: usize,
    pub field_sets: Vec<FieldSetReport>,
}

/// Output of [`Experiment::run`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperimentReport {
    pub queries: Vec<QueryReport>,
    pub summary: Summary,
    pub convention: LabelConvention,
    #[serde(skip)]
    pub field_set_labels: Vec<String>,
    #[serde(skip)]
    pub mode_names: Vec<String>,
}

/// An evaluation over a fixed retriever, field-sets and modes.
#[derive(Debug)]
pub struct Experiment {
    retriever: Retriever,
    field_sets: Vec<FieldSetSpec>,
    modes: Vec<ModeSpec>,
    tfidf: Option<TfIdfIndex>,
}

impl Experiment {
    /// Creates an experiment. The TF-IDF index is fitted here when a mode needs it.
    pub fn new(retriever: Retriever, field_sets: Vec<FieldSetSpec>, modes: Vec<ModeSpec>) -> Self {
        let tfidf = modes
            .iter()
            .any(|m| m.strategy == Strategy::TfIdf)
            .then(|| TfIdfIndex::build(retriever.corpus()));
        Self {
            retriever,
            field_sets,
            modes,
            tfidf,
        }
    }

    /// Default field-sets and modes.
    pub fn with_defaults(retriever: Retriever) -> Self {
        Self::new(retriever, FieldSetSpec::defaults(), ModeSpec::defaults())
    }

    pub fn retriever(&self) -> &Retriever {
        &self.retriever
    }

    pub fn modes(&self) -> &[ModeSpec] {
        &self.modes
    }

    pub fn field_sets(&self) -> &[FieldSetSpec] {
        &self.field_sets
    }

    fn validate(&self) -> Result<()> {
        if self.modes.is_empty() {
            return Err(Error::InvalidConfig("experiment needs at least one mode".into()));
        }
        if self.field_sets.is_empty() {
            return Err(Error::InvalidConfig(
                "experiment needs at least one field set".into(),
            ));
        }
        let mut names = HashSet::new();
        if let Some(dup) = self.modes.iter().find(|m| !names.insert(m.name.as_str())) {
            return Err(Error::InvalidConfig(format!("duplicate mode '{}'", dup.name)));
        }
        let mut labels = HashSet::new();
        if let Some(dup) = self
            .field_sets
            .iter()
            .find(|f| !labels.insert(f.label.as_str()))
        {
            return Err(Error::InvalidConfig(format!(
                "duplicate field set '{}'",
                dup.label
            )));
        }
        let summary_label = &self.retriever.config().summary_field_set;
        if !self.field_sets.iter().any(|f| &f.label == summary_label) {
            return Err(Error::UnknownFieldSet(summary_label.clone()));
        }
        Ok(())
    }

    fn retrieve(&self, mode: &ModeSpec, query: &str, fields: &FieldSet) -> Vec<String> {
        match &mode.strategy {
            Strategy::Boolean { expand, norm } => {
                self.retriever.retrieve(query, *expand, *norm, fields)
            }
            Strategy::Scored { expand, norm } => self
                .retriever
                .retrieve_scored(query, *expand, *norm)
                .into_iter()
                .map(|s| s.id)
                .collect(),
            Strategy::TfIdf => self
                .tfidf
                .as_ref()
                .map(|idx| idx.search(query).into_iter().map(|s| s.id).collect())
                .unwrap_or_default(),
            Strategy::Precomputed(results) => match results.get(query) {
                Some(ids) => ids.clone(),
                None => {
                    tracing::warn!(mode = %mode.name, query, "no precomputed results for query");
                    Vec::new()
                }
            },
        }
    }

    /// Evaluate every query under every field-set and mode, then summarize.
    pub fn run<S: AsRef<str>>(&self, queries: &[S]) -> Result<ExperimentReport> {
        self.validate()?;
        let config = self.retriever.config();
        let convention = config.label_convention;
        let corpus = self.retriever.corpus();
        let universe: Vec<&str> = corpus.ids().collect();

        tracing::info!(
            queries = queries.len(),
            field_sets = self.field_sets.len(),
            modes = self.modes.len(),
            documents = corpus.len(),
            %convention,
            "Starting experiment"
        );

        let mut reports = Vec::with_capacity(queries.len());
        for query in queries {
            let query = query.as_ref();
            let truth = ground_truth(
                corpus,
                self.retriever.synonyms(),
                query,
                config.synonym_weight_threshold,
            );

            // field-set independent modes run once per query
            let shared: HashMap<&str, Vec<String>> = self
                .modes
                .iter()
                .filter(|m| !m.uses_field_set())
                .map(|m| (m.name.as_str(), self.retrieve(m, query, &FieldSet::all())))
                .collect();

            let field_sets = self
                .field_sets
                .iter()
                .map(|fs| {
                    let results: Vec<ModeResult> = self
                        .modes
                        .iter()
                        .map(|mode| {
                            let owned;
                            let retrieved = match shared.get(mode.name.as_str()) {
                                Some(ids) => ids,
                                None => {
                                    owned = self.retrieve(mode, query, &fs.fields);
                                    &owned
                                }
                            };
                            ModeResult {
                                mode: mode.name.clone(),
                                retrieved: retrieved.len(),
                                record: evaluate(retrieved, &truth, &universe, convention),
                            }
                        })
                        .collect();
                    let delta_f1 = match results.iter().find(|r| r.mode == BASELINE_MODE) {
                        Some(base) => results
                            .iter()
                            .filter(|r| r.mode != BASELINE_MODE)
                            .map(|r| (r.mode.clone(), r.record.f1 - base.record.f1))
                            .collect(),
                        None => Vec::new(),
                    };
                    FieldSetReport {
                        label: fs.label.clone(),
                        results,
                        delta_f1,
                    }
                })
                .collect();

            tracing::info!(query, ground_truth = truth.len(), "Evaluated query");
            reports.push(QueryReport {
                query: query.to_string(),
                ground_truth_count: truth.len(),
                field_sets,
            });
        }

        let mut report = ExperimentReport {
            queries: reports,
            summary: Summary::default(),
            convention,
            field_set_labels: self.field_sets.iter().map(|f| f.label.clone()).collect(),
            mode_names: self.modes.iter().map(|m| m.name.clone()).collect(),
        };
        report.summary = summarize(&report, &config.summary_field_set)?;
        tracing::info!(queries = report.queries.len(), "Experiment finished");
        Ok(report)
    }
}
