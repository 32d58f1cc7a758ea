//! Qdrant REST backend.
//!
//! Talks to a Qdrant cluster over HTTP with an `api-key` header:
//!
//! | Operation | Request |
//! |-----------|---------|
//! | create | `DELETE /collections/{name}` then `PUT /collections/{name}` |
//! | upsert | `PUT /collections/{name}/points?wait=true` |
//! | search | `POST /collections/{name}/points/search` |

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Distance, Point, ScoredPoint, SearchFilter, VectorStore};
use crate::models::RecordPayload;

/// Qdrant HTTP client bound to one cluster.
pub struct QdrantStore {
    client: reqwest::Client,
    base_url: String,
}

impl QdrantStore {
    /// Build a client for `url` authenticated with `api_key`.
    pub fn new(url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        anyhow::ensure!(
            url.starts_with("http://") || url.starts_with("https://"),
            "Qdrant URL must be an http(s) URL"
        );
        let mut headers = HeaderMap::new();
        headers.insert(
            "api-key",
            HeaderValue::from_str(api_key.trim()).context("invalid Qdrant API key")?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .context("failed to build Qdrant HTTP client")?;
        Ok(Self {
            client,
            base_url: url.trim_end_matches('/').to_string(),
        })
    }

    fn collection_url(&self, name: &str) -> String {
        format!("{}/collections/{}", self.base_url, name)
    }
}

fn distance_name(distance: Distance) -> &'static str {
    match distance {
        Distance::Cosine => "Cosine",
        Distance::Dot => "Dot",
        Distance::Euclid => "Euclid",
    }
}

/// Turn a non-success response into an error carrying the body text.
async fn check(response: reqwest::Response, what: &str) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<body unavailable>".to_string());
    Err(anyhow!("Qdrant {} failed ({}): {}", what, status, body))
}

#[derive(Serialize)]
struct SearchBody<'a> {
    vector: &'a [f32],
    limit: usize,
    with_payload: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    result: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct SearchHit {
    id: serde_json::Value,
    score: f32,
    payload: Option<RecordPayload>,
}

impl SearchHit {
    fn into_scored(self) -> Result<ScoredPoint> {
        let id = match self.id {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        };
        let payload = self
            .payload
            .ok_or_else(|| anyhow!("Qdrant hit {} has no payload", id))?;
        Ok(ScoredPoint {
            id,
            score: self.score,
            payload,
        })
    }
}

#[async_trait]
impl VectorStore for QdrantStore {
    async fn create_collection(&self, name: &str, dims: usize, distance: Distance) -> Result<()> {
        let url = self.collection_url(name);

        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .context("Qdrant delete collection request failed")?;
        if response.status() != StatusCode::NOT_FOUND {
            check(response, "delete collection").await?;
        }
        debug!(collection = name, "previous collection removed");

        let body = serde_json::json!({
            "vectors": { "size": dims, "distance": distance_name(distance) }
        });
        let response = self
            .client
            .put(&url)
            .json(&body)
            .send()
            .await
            .context("Qdrant create collection request failed")?;
        check(response, "create collection").await?;
        Ok(())
    }

    async fn upsert(&self, name: &str, points: &[Point]) -> Result<()> {
        let url = format!("{}/points?wait=true", self.collection_url(name));
        let body = serde_json::json!({ "points": points });
        let response = self
            .client
            .put(&url)
            .json(&body)
            .send()
            .await
            .context("Qdrant upsert request failed")?;
        check(response, "upsert").await?;
        debug!(collection = name, count = points.len(), "points upserted");
        Ok(())
    }

    async fn search(
        &self,
        name: &str,
        vector: &[f32],
        limit: usize,
        filter: &SearchFilter,
    ) -> Result<Vec<ScoredPoint>> {
        let url = format!("{}/points/search", self.collection_url(name));
        let body = SearchBody {
            vector,
            limit,
            with_payload: true,
            filter: filter.to_qdrant(),
        };
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .context("Qdrant search request failed")?;
        let parsed: SearchResponse = check(response, "search")
            .await?
            .json()
            .await
            .context("failed to parse Qdrant search response")?;

        parsed
            .result
            .into_iter()
            .map(SearchHit::into_scored)
            .collect()
    }
}
