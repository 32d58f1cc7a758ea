//! Embedding provider abstraction and implementations.
//!
//! Defines the [`Embedder`] trait and concrete implementations:
//! - **[`DisabledProvider`]** — returns errors; used when embeddings are not configured.
//! - **[`OpenAIProvider`]** — calls an OpenAI-compatible `/embeddings` endpoint.
//! - **[`OllamaProvider`]** — calls a local Ollama instance's `/api/embed` endpoint.
//! - **[`RetryEmbedder`]** — optional wrapper adding exponential backoff.
//!
//! Providers make exactly one request per call. Retrying is a policy the
//! caller opts into with `embedding.max_retries`, which wraps the provider
//! in a [`RetryEmbedder`]:
//! - HTTP 429 / 5xx / network errors are retried
//! - Other 4xx errors ([`ApiError`]) fail immediately
//! - Backoff: base, 2×base, 4×base, ... (capped at 2^5)
//!
//! # Provider Selection
//!
//! ```rust,no_run
//! # use event_kb::config::EmbeddingConfig;
//! # use event_kb::embedding::{create_provider, Embedder};
//! let config = EmbeddingConfig { provider: "disabled".into(), ..Default::default() };
//! let provider = create_provider(&config, 768).unwrap();
//! assert_eq!(provider.model_name(), "disabled");
//! ```

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::warn;

use crate::config::EmbeddingConfig;

/// Turns text into a fixed-dimension vector.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Returns the model identifier (e.g. `"text-embedding-3-small"`).
    fn model_name(&self) -> &str;
    /// Returns the embedding vector dimensionality (e.g. `768`).
    fn dims(&self) -> usize;
    /// Embed a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

#[async_trait]
impl<E: Embedder + ?Sized> Embedder for Box<E> {
    fn model_name(&self) -> &str {
        (**self).model_name()
    }
    fn dims(&self) -> usize {
        (**self).dims()
    }
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        (**self).embed(text).await
    }
}

// ============ Disabled Provider ============

/// A no-op embedding provider that always returns errors.
pub struct DisabledProvider;

#[async_trait]
impl Embedder for DisabledProvider {
    fn model_name(&self) -> &str {
        "disabled"
    }
    fn dims(&self) -> usize {
        0
    }
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        bail!("Embedding provider is disabled")
    }
}

// ============ OpenAI Provider ============

/// Non-success HTTP response from an embedding API.
#[derive(Debug, thiserror::Error)]
#[error("{provider} API error {status}: {body}")]
pub struct ApiError {
    pub provider: &'static str,
    pub status: u16,
    pub body: String,
}

impl ApiError {
    /// Rate limits and server errors may succeed on a later attempt.
    pub fn is_retryable(&self) -> bool {
        self.status == 429 || self.status >= 500
    }
}

async fn api_error(provider: &'static str, response: reqwest::Response) -> ApiError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    ApiError {
        provider,
        status,
        body,
    }
}

const OPENAI_DEFAULT_URL: &str = "https://api.openai.com/v1";

/// Embedding provider using the OpenAI embeddings API.
///
/// Requires the `OPENAI_API_KEY` environment variable. The configured
/// dimension is sent as `dimensions`, so `text-embedding-3-*` models return
/// vectors sized for the collection.
pub struct OpenAIProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    dims: usize,
}

impl OpenAIProvider {
    pub fn new(config: &EmbeddingConfig, dims: usize) -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow::anyhow!("OPENAI_API_KEY environment variable not set"))?;
        let base = config.url.as_deref().unwrap_or(OPENAI_DEFAULT_URL);
        Self::with_endpoint(config, dims, base, api_key)
    }

    /// Build against an explicit base URL and key.
    pub fn with_endpoint(
        config: &EmbeddingConfig,
        dims: usize,
        base_url: &str,
        api_key: String,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed to build OpenAI HTTP client")?;
        Ok(Self {
            client,
            endpoint: format!("{}/embeddings", base_url.trim_end_matches('/')),
            api_key,
            model: config.model.clone(),
            dims,
        })
    }
}

#[async_trait]
impl Embedder for OpenAIProvider {
    fn model_name(&self) -> &str {
        &self.model
    }
    fn dims(&self) -> usize {
        self.dims
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let body = serde_json::json!({
            "model": self.model,
            "input": text,
            "dimensions": self.dims,
        });

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("OpenAI embeddings request failed")?;

        if !response.status().is_success() {
            return Err(api_error("OpenAI", response).await.into());
        }

        let json: serde_json::Value = response.json().await?;
        first_vector(parse_openai_response(&json)?)
    }
}

/// Extract the `data[].embedding` arrays, in input order.
fn parse_openai_response(json: &serde_json::Value) -> Result<Vec<Vec<f32>>> {
    let data = json
        .get("data")
        .and_then(|d| d.as_array())
        .ok_or_else(|| anyhow::anyhow!("Invalid OpenAI response: missing data array"))?;

    let mut embeddings = Vec::with_capacity(data.len());
    for item in data {
        let embedding = item
            .get("embedding")
            .and_then(|e| e.as_array())
            .ok_or_else(|| anyhow::anyhow!("Invalid OpenAI response: missing embedding"))?;
        embeddings.push(to_f32_vec(embedding));
    }
    Ok(embeddings)
}

// ============ Ollama Provider ============

const OLLAMA_DEFAULT_URL: &str = "http://localhost:11434";

/// Embedding provider using a local Ollama instance (`POST /api/embed`).
pub struct OllamaProvider {
    client: reqwest::Client,
    url: String,
    model: String,
    dims: usize,
}

impl OllamaProvider {
    pub fn new(config: &EmbeddingConfig, dims: usize) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed to build Ollama HTTP client")?;
        let url = config
            .url
            .clone()
            .unwrap_or_else(|| OLLAMA_DEFAULT_URL.to_string());
        Ok(Self {
            client,
            url: url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            dims,
        })
    }
}

#[async_trait]
impl Embedder for OllamaProvider {
    fn model_name(&self) -> &str {
        &self.model
    }
    fn dims(&self) -> usize {
        self.dims
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let body = serde_json::json!({
            "model": self.model,
            "input": text,
        });

        let response = self
            .client
            .post(format!("{}/api/embed", self.url))
            .json(&body)
            .send()
            .await
            .with_context(|| format!("Ollama connection error (is Ollama running at {}?)", self.url))?;

        if !response.status().is_success() {
            return Err(api_error("Ollama", response).await.into());
        }

        let json: serde_json::Value = response.json().await?;
        first_vector(parse_ollama_response(&json)?)
    }
}

fn parse_ollama_response(json: &serde_json::Value) -> Result<Vec<Vec<f32>>> {
    let embeddings = json
        .get("embeddings")
        .and_then(|e| e.as_array())
        .ok_or_else(|| anyhow::anyhow!("Invalid Ollama response: missing embeddings array"))?;

    embeddings
        .iter()
        .map(|embedding| {
            embedding
                .as_array()
                .map(|values| to_f32_vec(values))
                .ok_or_else(|| anyhow::anyhow!("Invalid Ollama response: embedding is not an array"))
        })
        .collect()
}

fn to_f32_vec(values: &[serde_json::Value]) -> Vec<f32> {
    values
        .iter()
        .map(|v| v.as_f64().unwrap_or(0.0) as f32)
        .collect()
}

fn first_vector(vectors: Vec<Vec<f32>>) -> Result<Vec<f32>> {
    vectors
        .into_iter()
        .next()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| anyhow::anyhow!("Empty embedding response"))
}

// ============ Retry wrapper ============

/// Retries a failing provider with exponential backoff.
pub struct RetryEmbedder<E> {
    inner: E,
    max_retries: u32,
    base_delay: Duration,
}

impl<E: Embedder> RetryEmbedder<E> {
    pub fn new(inner: E, max_retries: u32, base_delay: Duration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
        }
    }
}

#[async_trait]
impl<E: Embedder> Embedder for RetryEmbedder<E> {
    fn model_name(&self) -> &str {
        self.inner.model_name()
    }
    fn dims(&self) -> usize {
        self.inner.dims()
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut last_err = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.base_delay * (1u32 << (attempt - 1).min(5));
                tokio::time::sleep(delay).await;
            }

            match self.inner.embed(text).await {
                Ok(vector) => return Ok(vector),
                Err(e) => {
                    if e
                        .downcast_ref::<ApiError>()
                        .is_some_and(|api| !api.is_retryable())
                    {
                        return Err(e);
                    }
                    warn!(attempt, error = %e, "embedding attempt failed");
                    last_err = Some(e);
                }
            }
        }

        Err(last_err.unwrap_or_else(|| anyhow::anyhow!("Embedding failed after retries")))
    }
}

/// Create the configured provider, wrapped in [`RetryEmbedder`] when
/// `max_retries > 0`.
///
/// | Config Value | Provider |
/// |-------------|----------|
/// | `"disabled"` | [`DisabledProvider`] |
/// | `"openai"` | [`OpenAIProvider`] |
/// | `"ollama"` | [`OllamaProvider`] |
pub fn create_provider(config: &EmbeddingConfig, dims: usize) -> Result<Box<dyn Embedder>> {
    let provider: Box<dyn Embedder> = match config.provider.as_str() {
        "disabled" => Box::new(DisabledProvider),
        "openai" => Box::new(OpenAIProvider::new(config, dims)?),
        "ollama" => Box::new(OllamaProvider::new(config, dims)?),
        other => bail!("Unknown embedding provider: {}", other),
    };

    if config.max_retries > 0 {
        Ok(Box::new(RetryEmbedder::new(
            provider,
            config.max_retries,
            Duration::from_secs(1),
        )))
    } else {
        Ok(provider)
    }
}

/// Compute cosine similarity between two embedding vectors.
///
/// Returns a value in `[-1.0, 1.0]`; `0.0` for empty vectors or vectors of
/// different lengths.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < f32::EPSILON {
        return 0.0;
    }

    dot / denom
}
