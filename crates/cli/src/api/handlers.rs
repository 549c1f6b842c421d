//! HTTP request handlers and shared application state.

use crate::api::errors::ApiError;
use crate::api::metrics;
use crate::api::models::*;
use axum::extract::{Path, Query, State};
use axum::Json;
use lexeval_core::config;
use lexeval_core::document::Document;
use lexeval_core::retrieval::Retriever;
use lexeval_core::text::NormMode;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Instant;

/// Shared application state passed to every handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Read-only retriever over the loaded corpus and synonym table.
    pub retriever: Arc<Retriever>,
    pub prometheus_handle: PrometheusHandle,
    pub start_time: Instant,
    /// Hits returned when the request carries no `limit`.
    pub default_limit: usize,
}

impl AppState {
    pub fn new(retriever: Arc<Retriever>, prometheus_handle: PrometheusHandle) -> Self {
        Self {
            retriever,
            prometheus_handle,
            start_time: Instant::now(),
            default_limit: config::DEFAULT_SEARCH_LIMIT,
        }
    }
}

/// `GET /search?q=&expand=&lemmas=&limit=`: weighted search over title,
/// abstract and tags.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let query = params
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing query".into()))?
        .to_string();
    let expand = parse_flag(params.expand.as_deref(), false).map_err(ApiError::BadRequest)?;
    let lemmas = parse_flag(params.lemmas.as_deref(), true).map_err(ApiError::BadRequest)?;
    let limit = params.limit.unwrap_or(state.default_limit);
    if limit == 0 || limit > config::MAX_SEARCH_LIMIT {
        return Err(ApiError::BadRequest(format!(
            "limit must be 1-{}",
            config::MAX_SEARCH_LIMIT
        )));
    }

    let mode = if lemmas { NormMode::Lemma } else { NormMode::None };
    let retriever = &state.retriever;
    let expanded_terms = retriever.expanded_terms(&query, expand);
    let terms = retriever.normalize_terms(&expanded_terms, mode);

    let corpus = retriever.corpus();
    let results: Vec<SearchHit> = retriever
        .retrieve_scored_terms(&terms, mode)
        .into_iter()
        .take(limit)
        .filter_map(|hit| {
            corpus.get(&hit.id).map(|doc| SearchHit {
                document: Document::clone(doc),
                score: (hit.score * 10_000.0).round() / 10_000.0,
            })
        })
        .collect();
    let normalized_terms: Vec<String> = terms.into_iter().map(|t| t.term).collect();

    metrics::record_search(expand, lemmas, results.len());
    tracing::info!(query = %query, expand, lemmas, hits = results.len(), "search");

    let message = results
        .is_empty()
        .then(|| "No documents matched the query.".to_string());
    Ok(Json(SearchResponse {
        query,
        expanded_terms,
        normalized_terms,
        results,
        message,
    }))
}

/// `GET /synonyms`: the loaded table in source key order.
pub async fn list_synonyms(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let body = SynonymTableResponse {
        status: "success",
        synonyms: state.retriever.synonyms(),
    };
    serde_json::to_value(body)
        .map(Json)
        .map_err(|e| ApiError::Internal(format!("Failed to encode synonym table: {e}")))
}

/// `GET /synonyms/:term`: one entry, looked up case-insensitively.
pub async fn get_synonyms(
    State(state): State<AppState>,
    Path(term): Path<String>,
) -> Result<Json<SynonymEntryResponse>, ApiError> {
    let similar = state
        .retriever
        .synonyms()
        .get(&term)
        .ok_or_else(|| ApiError::NotFound(format!("No synonyms for '{}'", term)))?;
    Ok(Json(SynonymEntryResponse {
        term: term.to_lowercase(),
        synonyms: similar.to_vec(),
    }))
}

/// `GET /documents/:id`.
pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Document>, ApiError> {
    state
        .retriever
        .corpus()
        .get(&id)
        .map(|doc| Json(Document::clone(doc)))
        .ok_or_else(|| ApiError::NotFound(format!("Document '{}' not found", id)))
}

/// `GET /health`.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        documents: state.retriever.corpus().len(),
        synonym_terms: state.retriever.synonyms().len(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// `GET /metrics`: Prometheus text exposition.
pub async fn metrics_endpoint(State(state): State<AppState>) -> String {
    state.prometheus_handle.render()
}
