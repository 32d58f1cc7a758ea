//! TOML configuration for the knowledge base.
//!
//! Every section is optional; missing sections take their defaults. Store
//! connection parameters may also come from the environment or CLI flags,
//! which the binary applies on top of the file with [`Config::with_overrides`].

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default = "default_vector_size")]
    pub vector_size: usize,
    #[serde(default = "default_distance")]
    pub distance: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            collection: default_collection(),
            vector_size: default_vector_size(),
            distance: default_distance(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_collection() -> String {
    "event-kb".to_string()
}
fn default_vector_size() -> usize {
    768
}
fn default_distance() -> String {
    "cosine".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChunkingConfig {
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_chars: default_max_chars(),
        }
    }
}

fn default_max_chars() -> usize {
    800
}

#[derive(Debug, Deserialize, Clone)]
pub struct IngestConfig {
    #[serde(default = "default_include_globs")]
    pub include_globs: Vec<String>,
    #[serde(default)]
    pub exclude_globs: Vec<String>,
    #[serde(default)]
    pub follow_symlinks: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            include_globs: default_include_globs(),
            exclude_globs: Vec::new(),
            follow_symlinks: false,
        }
    }
}

fn default_include_globs() -> Vec<String> {
    vec!["**/*.md".to_string()]
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmbeddingConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub dims: Option<usize>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub max_retries: u32,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            dims: None,
            url: None,
            timeout_secs: default_timeout_secs(),
            max_retries: 0,
        }
    }
}

fn default_provider() -> String {
    "openai".to_string()
}
fn default_model() -> String {
    "text-embedding-3-small".to_string()
}

/// Store connection parameters resolved from file, environment and flags.
#[derive(Debug, Clone)]
pub struct Connection {
    pub url: String,
    pub api_key: String,
    pub collection: String,
}

impl Config {
    /// Apply CLI / environment values on top of the file values.
    pub fn with_overrides(
        mut self,
        url: Option<String>,
        api_key: Option<String>,
        collection: Option<String>,
    ) -> Self {
        if url.is_some() {
            self.store.url = url;
        }
        if api_key.is_some() {
            self.store.api_key = api_key;
        }
        if let Some(c) = collection {
            self.store.collection = c;
        }
        self
    }

    /// Resolve the connection, failing if URL or API key is missing.
    pub fn connection(&self) -> Result<Connection> {
        let url = non_empty(self.store.url.as_deref());
        let api_key = non_empty(self.store.api_key.as_deref());
        match (url, api_key) {
            (Some(url), Some(api_key)) => Ok(Connection {
                url: url.to_string(),
                api_key: api_key.to_string(),
                collection: self.store.collection.clone(),
            }),
            _ => bail!(
                "Please set QDRANT_URL and QDRANT_API_KEY environment variables \
                 or use --qdrant-url and --api-key arguments"
            ),
        }
    }

    /// Dimension used for both the collection and the embedding request.
    pub fn vector_size(&self) -> usize {
        self.embedding.dims.unwrap_or(self.store.vector_size)
    }

    pub fn validate(&self) -> Result<()> {
        if self.chunking.max_chars == 0 {
            bail!("chunking.max_chars must be > 0");
        }
        if self.store.vector_size == 0 {
            bail!("store.vector_size must be > 0");
        }
        if self.store.collection.trim().is_empty() {
            bail!("store.collection must not be empty");
        }
        if let Some(dims) = self.embedding.dims {
            if dims != self.store.vector_size {
                bail!(
                    "embedding.dims ({}) must match store.vector_size ({})",
                    dims,
                    self.store.vector_size
                );
            }
        }
        match self.store.distance.as_str() {
            "cosine" | "dot" | "euclid" => {}
            other => bail!(
                "Unknown store.distance: '{}'. Must be cosine, dot, or euclid.",
                other
            ),
        }
        match self.embedding.provider.as_str() {
            "disabled" | "openai" | "ollama" => {}
            other => bail!(
                "Unknown embedding provider: '{}'. Must be disabled, openai, or ollama.",
                other
            ),
        }
        for pattern in self
            .ingest
            .include_globs
            .iter()
            .chain(&self.ingest.exclude_globs)
        {
            globset::Glob::new(pattern)
                .with_context(|| format!("Invalid ingest glob: '{}'", pattern))?;
        }
        Ok(())
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

/// Load configuration from `path`, or defaults when no path is given.
pub fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    let config = match path {
        Some(path) => parse_file(path)?,
        None => Config::default(),
    };
    config.validate()?;
    Ok(config)
}

fn parse_file(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    toml::from_str(&content).with_context(|| "Failed to parse config file")
}
