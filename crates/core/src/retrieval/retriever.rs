//! Boolean and weighted retrieval over an in-memory corpus.

use crate::config::PipelineConfig;
use crate::expansion::{expand_query, original_term, SynonymTable, WeightedTerm};
use crate::retrieval::field::{Field, FieldSet};
use crate::retrieval::matcher;
use crate::retrieval::{rank, ScoredId};
use crate::storage::{lemmatize_corpus, Corpus};
use crate::text::{NormMode, Normalizer};
use std::sync::{Arc, OnceLock};

/// Runs queries against a corpus with a fixed synonym table and normalizer.
///
/// Cheap to clone and safe to share: every input is read-only.
#[derive(Debug, Clone)]
pub struct Retriever {
    corpus: Arc<Corpus>,
    synonyms: Arc<SynonymTable>,
    normalizer: Normalizer,
    config: PipelineConfig,
    /// Lemmatized corpus, built on first lemma-mode weighted search.
    lemmatized: OnceLock<Arc<Corpus>>,
}

impl Retriever {
    /// Creates a retriever.
    pub fn new(
        corpus: Arc<Corpus>,
        synonyms: Arc<SynonymTable>,
        normalizer: Normalizer,
        config: PipelineConfig,
    ) -> Self {
        Self {
            corpus,
            synonyms,
            normalizer,
            config,
            lemmatized: OnceLock::new(),
        }
    }

    pub fn corpus(&self) -> &Arc<Corpus> {
        &self.corpus
    }

    pub fn synonyms(&self) -> &Arc<SynonymTable> {
        &self.synonyms
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// The corpus with every field lemmatized word by word; built once.
    pub fn lemmatized_corpus(&self) -> &Arc<Corpus> {
        self.lemmatized
            .get_or_init(|| Arc::new(lemmatize_corpus(&self.corpus, &self.normalizer)))
    }

    /// Expansion of `query` when `expand` is set, otherwise the query alone.
    pub fn expanded_terms(&self, query: &str, expand: bool) -> Vec<WeightedTerm> {
        if expand {
            expand_query(query, &self.synonyms, self.config.synonym_weight_threshold)
        } else {
            original_term(query)
        }
    }

    /// Normalizes already expanded terms under `mode`, weights carried
    /// through. Terms that normalize to the empty string are dropped.
    pub fn normalize_terms(&self, terms: &[WeightedTerm], mode: NormMode) -> Vec<WeightedTerm> {
        terms
            .iter()
            .map(|t| WeightedTerm::new(self.normalizer.normalize(&t.term, mode), t.weight))
            .filter(|t| !t.term.is_empty())
            .collect()
    }

    /// Expanded terms normalized under `mode`.
    pub fn query_terms(&self, query: &str, expand: bool, mode: NormMode) -> Vec<WeightedTerm> {
        let terms = self.normalize_terms(&self.expanded_terms(query, expand), mode);
        tracing::debug!(query, expand, mode = %mode, terms = ?terms, "Query terms");
        terms
    }

    /// Boolean retrieval: ids of documents where any term matches any field
    /// of `fields`, in corpus order.
    pub fn retrieve(
        &self,
        query: &str,
        expand: bool,
        mode: NormMode,
        fields: &FieldSet,
    ) -> Vec<String> {
        let terms: Vec<String> = self
            .query_terms(query, expand, mode)
            .into_iter()
            .map(|t| t.term)
            .collect();
        if terms.is_empty() {
            return Vec::new();
        }
        self.corpus
            .iter()
            .filter(|(_, folded)| fields.iter().any(|f| matcher::matches(folded, &terms, f)))
            .map(|(doc, _)| doc.id.clone())
            .collect()
    }

    /// Weighted retrieval: each term adds `field_weight * term_weight` for
    /// every field it occurs in. Title and abstract use plain substring
    /// containment here, unlike the Boolean title policy.
    ///
    /// Only positive scores are returned, descending, ties in corpus order,
    /// truncated to `scored_top_k` when configured.
    pub fn retrieve_scored(&self, query: &str, expand: bool, mode: NormMode) -> Vec<ScoredId> {
        let terms = self.query_terms(query, expand, mode);
        self.retrieve_scored_terms(&terms, mode)
    }

    /// Weighted retrieval over terms already normalized under `mode`.
    ///
    /// Lemma-mode terms are matched against [`Self::lemmatized_corpus`];
    /// other modes against the folded source text.
    pub fn retrieve_scored_terms(&self, terms: &[WeightedTerm], mode: NormMode) -> Vec<ScoredId> {
        if terms.is_empty() {
            return Vec::new();
        }
        let corpus = match mode {
            NormMode::Lemma => self.lemmatized_corpus(),
            NormMode::None | NormMode::Stem => &self.corpus,
        };
        let weights = &self.config.weights;
        let mut results: Vec<ScoredId> = corpus
            .iter()
            .filter_map(|(doc, folded)| {
                let score: f64 = terms
                    .iter()
                    .map(|t| {
                        let term = t.term.as_str();
                        let mut s = 0.0;
                        if folded.title.contains(term) {
                            s += weights.get(Field::Title) * t.weight;
                        }
                        if folded.abstract_text.contains(term) {
                            s += weights.get(Field::Abstract) * t.weight;
                        }
                        if folded.tags.iter().any(|tag| tag.contains(term)) {
                            s += weights.get(Field::Tags) * t.weight;
                        }
                        s
                    })
                    .sum();
                (score > 0.0).then(|| ScoredId::new(doc.id.clone(), score))
            })
            .collect();
        rank(&mut results);
        if let Some(k) = self.config.scored_top_k {
            results.truncate(k);
        }
        results
    }
}
