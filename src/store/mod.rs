//! Knowledge store adapter.
//!
//! The [`VectorStore`] trait defines the three operations the pipeline
//! needs from a vector database (create collection, upsert, filtered
//! search), enabling pluggable backends:
//!
//! | Backend | Purpose |
//! |---------|---------|
//! | [`qdrant::QdrantStore`] | Qdrant REST API |
//! | [`memory::InMemoryStore`] | brute-force in-process store for tests |
//!
//! Backends return `anyhow::Result`. [`KnowledgeStore`] sits on top and is
//! the failure boundary: every backend error is logged and surfaces as
//! `false` or an empty result.

pub mod memory;
pub mod qdrant;

use anyhow::{bail, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::str::FromStr;
use tracing::{error, info};

use crate::models::{Phase, Record, RecordPayload, Role};

/// Similarity metric a collection is configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Distance {
    #[default]
    Cosine,
    Dot,
    Euclid,
}

impl FromStr for Distance {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "cosine" => Ok(Distance::Cosine),
            "dot" => Ok(Distance::Dot),
            "euclid" => Ok(Distance::Euclid),
            other => bail!("Unknown distance: '{}'", other),
        }
    }
}

/// A point written to the store.
#[derive(Debug, Clone, Serialize)]
pub struct Point {
    pub id: String,
    pub vector: Vec<f32>,
    pub payload: RecordPayload,
}

impl From<&Record> for Point {
    fn from(record: &Record) -> Self {
        Self {
            id: record.id.clone(),
            vector: record.embedding.clone(),
            payload: record.payload.clone(),
        }
    }
}

/// A search hit: point id, payload and similarity score.
#[derive(Debug, Clone)]
pub struct ScoredPoint {
    pub id: String,
    pub score: f32,
    pub payload: RecordPayload,
}

/// Conjunctive metadata filter. Every field that is set must match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchFilter {
    /// Exact match on `phase`.
    pub phase: Option<Phase>,
    /// Membership in `roles`.
    pub role: Option<Role>,
}

impl SearchFilter {
    pub fn new(phase: Option<Phase>, role: Option<Role>) -> Self {
        Self { phase, role }
    }

    pub fn is_empty(&self) -> bool {
        self.phase.is_none() && self.role.is_none()
    }

    /// Whether a stored payload satisfies the filter.
    pub fn matches(&self, payload: &RecordPayload) -> bool {
        self.phase.map_or(true, |p| payload.phase == p)
            && self.role.map_or(true, |r| payload.roles.contains(&r))
    }

    /// Qdrant `filter` object, or `None` for an unfiltered search.
    pub fn to_qdrant(&self) -> Option<serde_json::Value> {
        if self.is_empty() {
            return None;
        }
        let mut must = Vec::new();
        if let Some(phase) = self.phase {
            must.push(serde_json::json!({"key": "phase", "match": {"value": phase.label()}}));
        }
        if let Some(role) = self.role {
            must.push(serde_json::json!({"key": "roles", "match": {"value": role.as_str()}}));
        }
        Some(serde_json::json!({ "must": must }))
    }
}

/// Abstract vector database backend.
///
/// Implementations must be `Send + Sync`; callers drive them one request
/// at a time.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Create `name`, replacing any existing collection of that name.
    async fn create_collection(&self, name: &str, dims: usize, distance: Distance) -> Result<()>;

    /// Write points into `name`, waiting until they are applied.
    async fn upsert(&self, name: &str, points: &[Point]) -> Result<()>;

    /// Top-`limit` points by similarity, restricted by `filter`.
    async fn search(
        &self,
        name: &str,
        vector: &[f32],
        limit: usize,
        filter: &SearchFilter,
    ) -> Result<Vec<ScoredPoint>>;
}

/// Failure boundary around a [`VectorStore`] backend.
pub struct KnowledgeStore<S> {
    backend: S,
}

impl<S: VectorStore> KnowledgeStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Destructively (re)create a collection. Returns `false` on failure.
    pub async fn create_collection(&self, name: &str, dims: usize, distance: Distance) -> bool {
        info!(collection = name, dims, ?distance, "setting up collection");
        match self.backend.create_collection(name, dims, distance).await {
            Ok(()) => {
                info!(collection = name, "collection created");
                true
            }
            Err(e) => {
                error!(collection = name, error = %format!("{:#}", e), "error creating collection");
                false
            }
        }
    }

    /// Upsert one point per record in a single call. Returns `false` on failure.
    pub async fn upsert(&self, name: &str, records: &[Record]) -> bool {
        let points: Vec<Point> = records.iter().map(Point::from).collect();
        match self.backend.upsert(name, &points).await {
            Ok(()) => true,
            Err(e) => {
                error!(collection = name, error = %format!("{:#}", e), "error uploading records");
                false
            }
        }
    }

    /// Filtered similarity search. Returns an empty list on failure.
    pub async fn search(
        &self,
        name: &str,
        vector: &[f32],
        limit: usize,
        filter: &SearchFilter,
    ) -> Vec<ScoredPoint> {
        if limit == 0 {
            return Vec::new();
        }
        match self.backend.search(name, vector, limit, filter).await {
            Ok(mut hits) => {
                hits.truncate(limit);
                hits
            }
            Err(e) => {
                error!(collection = name, error = %format!("{:#}", e), "error searching knowledge base");
                Vec::new()
            }
        }
    }
}
