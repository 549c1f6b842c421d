//! Request and response data transfer objects for the search API.

use lexeval_core::document::Document;
use lexeval_core::expansion::{SimilarTerm, SynonymTable, WeightedTerm};
use serde::{Deserialize, Serialize};

/// Query string of `GET /search`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    #[serde(default)]
    pub expand: Option<String>,
    #[serde(default)]
    pub lemmas: Option<String>,
    pub limit: Option<usize>,
}

/// Lenient boolean flag: `1`, `true`, `on`, `yes` are true; `0`, `false`,
/// `off`, `no` and the empty string are false. Anything else is rejected.
pub fn parse_flag(value: Option<&str>, default: bool) -> Result<bool, String> {
    match value.map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(default),
        Some(v) => match v.as_str() {
            "1" | "true" | "on" | "yes" => Ok(true),
            "0" | "false" | "off" | "no" | "" => Ok(false),
            _ => Err(format!("invalid boolean '{v}'")),
        },
    }
}

/// One ranked document.
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(flatten)]
    pub document: Document,
    pub score: f64,
}

/// Response body of `GET /search`.
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub expanded_terms: Vec<WeightedTerm>,
    pub normalized_terms: Vec<String>,
    pub results: Vec<SearchHit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Response body of `GET /synonyms`.
#[derive(Debug, Serialize)]
pub struct SynonymTableResponse<'a> {
    pub status: &'static str,
    pub synonyms: &'a SynonymTable,
}

/// Response body of `GET /synonyms/:term`.
#[derive(Debug, Serialize, Deserialize)]
pub struct SynonymEntryResponse {
    pub term: String,
    pub synonyms: Vec<SimilarTerm>,
}

/// Response body of `GET /health`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub documents: usize,
    pub synonym_terms: usize,
    pub uptime_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag(None, true), Ok(true));
        assert_eq!(parse_flag(Some("TRUE"), false), Ok(true));
        assert_eq!(parse_flag(Some("0"), true), Ok(false));
        assert_eq!(parse_flag(Some(""), true), Ok(false));
        assert!(parse_flag(Some("maybe"), true).is_err());
    }
}
