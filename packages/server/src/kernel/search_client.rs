//! Vector index search client (retrieval gateway).
//!
//! The index itself is an external service; this client issues one bounded
//! free-text query per pipeline run and normalizes the raw hits: directory
//! prefixes are stripped from filenames here, not by the service, and hits
//! are returned sorted by descending relevance.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::traits::BaseSearchIndex;
use crate::common::identity;
use crate::domains::differences::Candidate;
use crate::error::{PipelineError, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Search request body understood by the index service.
#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    count: bool,
    skip: usize,
    top: usize,
    #[serde(rename = "searchMode")]
    search_mode: &'a str,
    #[serde(rename = "queryType")]
    query_type: &'a str,
    search: &'a str,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    value: Vec<SearchHit>,
}

/// One raw hit as the index returns it.
#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(rename = "@search.score")]
    score: f64,
    #[serde(default)]
    id: String,
    filename: String,
    page: i32,
    content: String,
}

/// Client for the externally hosted page index.
pub struct SearchIndexClient {
    /// Full search URL, including index name and api-version.
    endpoint: String,
    api_key: String,
    client: reqwest::Client,
}

impl SearchIndexClient {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }
}

fn normalize_hits(hits: Vec<SearchHit>) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = hits
        .into_iter()
        .map(|hit| Candidate {
            id: hit.id,
            filename: identity::file_name(&hit.filename).to_string(),
            page: hit.page,
            content: hit.content,
            score: hit.score,
        })
        .collect();
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    candidates
}

#[async_trait]
impl BaseSearchIndex for SearchIndexClient {
    async fn search(&self, query: &str, top: usize) -> Result<Vec<Candidate>> {
        let request = SearchRequest {
            count: true,
            skip: 0,
            top,
            search_mode: "any",
            query_type: "simple",
            search: query,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .timeout(REQUEST_TIMEOUT)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "search request failed");
                PipelineError::retrieval_unavailable(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "search API error");
            return Err(PipelineError::retrieval_unavailable(format!(
                "search service returned {}: {}",
                status, body
            )));
        }

        let search_response: SearchResponse = response.json().await.map_err(|e| {
            PipelineError::retrieval_unavailable(format!("invalid search response: {}", e))
        })?;

        Ok(normalize_hits(search_response.value))
    }
}
