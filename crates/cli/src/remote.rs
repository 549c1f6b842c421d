//! Client for an external search endpoint.
//!
//! Each query is sent as `GET {endpoint}?q=..&expand=..&lemmas=true` and the
//! ids of `results[]._id` are collected (plain strings or `{"$oid": ..}`).
//! Failed calls are retried a bounded number of times with a fixed delay;
//! when every attempt fails the query counts as having retrieved nothing and
//! the run continues.

use lexeval_core::config;
use lexeval_core::PipelineConfig;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RemoteId {
    Plain(String),
    Oid {
        #[serde(rename = "$oid")]
        oid: String,
    },
}

impl RemoteId {
    fn into_string(self) -> String {
        match self {
            RemoteId::Plain(s) => s,
            RemoteId::Oid { oid } => oid,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RemoteHit {
    #[serde(rename = "_id")]
    id: Option<RemoteId>,
}

#[derive(Debug, Deserialize)]
struct RemoteResponse {
    #[serde(default)]
    results: Vec<RemoteHit>,
}

/// HTTP client with a bounded retry policy.
#[derive(Debug, Clone)]
pub struct RemoteSearchClient {
    client: reqwest::Client,
    endpoint: String,
    max_attempts: u32,
    retry_delay: Duration,
}

impl RemoteSearchClient {
    /// Client using the retry policy of `cfg`.
    pub fn new(endpoint: impl Into<String>, cfg: &PipelineConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config::REMOTE_REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            max_attempts: cfg.remote_max_attempts.max(1),
            retry_delay: Duration::from_millis(cfg.remote_retry_delay_ms),
        })
    }

    /// Override the retry policy.
    pub fn with_retry(mut self, max_attempts: u32, retry_delay: Duration) -> Self {
        self.max_attempts = max_attempts.max(1);
        self.retry_delay = retry_delay;
        self
    }

    async fn attempt(&self, query: &str, expand: bool) -> Result<Vec<String>, reqwest::Error> {
        let expand = if expand { "true" } else { "false" };
        let response: RemoteResponse = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query), ("expand", expand), ("lemmas", "true")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(response
            .results
            .into_iter()
            .filter_map(|hit| hit.id.map(RemoteId::into_string))
            .collect())
    }

    /// Ids returned for `query`, or an empty list once all attempts failed.
    pub async fn search(&self, query: &str, expand: bool) -> Vec<String> {
        for attempt in 1..=self.max_attempts {
            match self.attempt(query, expand).await {
                Ok(ids) => {
                    tracing::debug!(query, attempt, hits = ids.len(), "remote search ok");
                    return ids;
                }
                Err(e) => {
                    tracing::warn!(
                        query,
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %e,
                        "remote search failed"
                    );
                    if attempt < self.max_attempts {
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
            }
        }
        tracing::warn!(query, "remote search gave up, treating as no results");
        Vec::new()
    }

    /// Search every query in turn, keyed by query string.
    pub async fn search_all<S: AsRef<str>>(
        &self,
        queries: &[S],
        expand: bool,
    ) -> HashMap<String, Vec<String>> {
        let mut out = HashMap::with_capacity(queries.len());
        for q in queries {
            let q = q.as_ref();
            let ids = self.search(q, expand).await;
            out.insert(q.to_string(), ids);
        }
        out
    }
}
