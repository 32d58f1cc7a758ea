//! In-memory [`VectorStore`] implementation for tests.
//!
//! Collections live in a `HashMap` behind `std::sync::RwLock`. Search is
//! brute force over every point, mirroring the Qdrant semantics the
//! pipeline relies on: destructive create, upsert by id, dimension checks
//! and `must`-filters.

use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;

use super::{Distance, Point, ScoredPoint, SearchFilter, VectorStore};
use crate::embedding::cosine_similarity;

struct Collection {
    dims: usize,
    distance: Distance,
    points: Vec<Point>,
}

/// In-process vector store.
pub struct InMemoryStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
        }
    }

    /// Configured dimension of a collection, if it exists.
    pub fn dims(&self, name: &str) -> Option<usize> {
        self.collections.read().unwrap().get(name).map(|c| c.dims)
    }

    /// Number of points in a collection (0 when missing).
    pub fn len(&self, name: &str) -> usize {
        self.collections
            .read()
            .unwrap()
            .get(name)
            .map_or(0, |c| c.points.len())
    }

    pub fn is_empty(&self, name: &str) -> bool {
        self.len(name) == 0
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn score(distance: Distance, a: &[f32], b: &[f32]) -> f32 {
    match distance {
        Distance::Cosine => cosine_similarity(a, b),
        Distance::Dot => a.iter().zip(b).map(|(x, y)| x * y).sum(),
        Distance::Euclid => a
            .iter()
            .zip(b)
            .map(|(x, y)| (x - y) * (x - y))
            .sum::<f32>()
            .sqrt(),
    }
}

#[async_trait]
impl VectorStore for InMemoryStore {
    async fn create_collection(&self, name: &str, dims: usize, distance: Distance) -> Result<()> {
        if dims == 0 {
            bail!("vector size must be > 0");
        }
        let mut collections = self.collections.write().unwrap();
        collections.insert(
            name.to_string(),
            Collection {
                dims,
                distance,
                points: Vec::new(),
            },
        );
        Ok(())
    }

    async fn upsert(&self, name: &str, points: &[Point]) -> Result<()> {
        let mut collections = self.collections.write().unwrap();
        let collection = collections
            .get_mut(name)
            .ok_or_else(|| anyhow!("collection '{}' not found", name))?;

        // Validate the whole batch first so a bad point writes nothing.
        for p in points {
            if p.vector.len() != collection.dims {
                bail!(
                    "wrong vector dimension for point {}: expected {}, got {}",
                    p.id,
                    collection.dims,
                    p.vector.len()
                );
            }
        }

        for p in points {
            collection.points.retain(|existing| existing.id != p.id);
            collection.points.push(p.clone());
        }
        Ok(())
    }

    async fn search(
        &self,
        name: &str,
        vector: &[f32],
        limit: usize,
        filter: &SearchFilter,
    ) -> Result<Vec<ScoredPoint>> {
        let collections = self.collections.read().unwrap();
        let collection = collections
            .get(name)
            .ok_or_else(|| anyhow!("collection '{}' not found", name))?;
        if vector.len() != collection.dims {
            bail!(
                "wrong query vector dimension: expected {}, got {}",
                collection.dims,
                vector.len()
            );
        }

        let mut hits: Vec<ScoredPoint> = collection
            .points
            .iter()
            .filter(|p| filter.matches(&p.payload))
            .map(|p| ScoredPoint {
                id: p.id.clone(),
                score: score(collection.distance, vector, &p.vector),
                payload: p.payload.clone(),
            })
            .collect();

        // Euclid is a distance: smaller is closer.
        hits.sort_by(|a, b| {
            let ord = b
                .score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal);
            if collection.distance == Distance::Euclid {
                ord.reverse()
            } else {
                ord
            }
        });
        hits.truncate(limit);
        Ok(hits)
    }
}
