//! Prometheus metrics recording.

use metrics::{counter, gauge, histogram};
use std::time::Duration;

/// Records HTTP request metrics.
pub fn record_request(method: &str, path: &str, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("path", path.to_string()),
        ("status", status.to_string()),
    ];
    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());
}

/// Records one search and the number of hits it returned.
pub fn record_search(expand: bool, lemmas: bool, hits: usize) {
    let labels = [
        ("expand", expand.to_string()),
        ("lemmas", lemmas.to_string()),
    ];
    counter!("lexeval_search_total", &labels).increment(1);
    histogram!("lexeval_search_hits", &labels).record(hits as f64);
    if hits == 0 {
        counter!("lexeval_search_empty_total").increment(1);
    }
}

/// Sets the gauges describing the loaded data.
pub fn set_corpus_gauges(documents: usize, synonym_terms: usize) {
    gauge!("lexeval_documents_total").set(documents as f64);
    gauge!("lexeval_synonym_terms_total").set(synonym_terms as f64);
}
