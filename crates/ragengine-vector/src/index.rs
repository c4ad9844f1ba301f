//! Similarity index capability consumed by the namespaced store.

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{VectorError, VectorResult};

/// A retrieval node ranked by similarity to a query vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredNode {
    /// Node identifier assigned at insertion.
    pub node_id: String,
    /// Similarity score; higher is closer.
    pub score: f32,
}

impl ScoredNode {
    /// Creates a scored node.
    pub fn new(node_id: impl Into<String>, score: f32) -> Self {
        Self {
            node_id: node_id.into(),
            score,
        }
    }
}

/// Embedding-backed similarity index owned by exactly one namespace.
#[async_trait]
pub trait SimilarityIndex: Send + Sync + 'static {
    /// Name of the backend that produced this index.
    fn backend_name(&self) -> &'static str;

    /// Vector dimension accepted by this index.
    fn dimension(&self) -> usize;

    /// Adds `(node_id, vector)` pairs to the index.
    async fn insert(&mut self, nodes: Vec<(String, Vec<f32>)>) -> VectorResult<()>;

    /// Returns at most `top_k` nodes ordered by descending score.
    async fn search(&self, query: &[f32], top_k: usize) -> VectorResult<Vec<ScoredNode>>;

    /// Removes nodes from the index.
    async fn remove(&mut self, _node_ids: &[String]) -> VectorResult<()> {
        Err(VectorError::unsupported(
            "delete_document",
            self.backend_name(),
        ))
    }

    /// Writes backend-owned state into the namespace directory `dir`.
    async fn persist(&self, dir: &Path) -> VectorResult<()>;

    /// Rejects vectors whose length differs from [`SimilarityIndex::dimension`].
    fn check_dimension(&self, vector: &[f32]) -> VectorResult<()> {
        if vector.len() != self.dimension() {
            return Err(VectorError::dimension_mismatch(
                self.dimension(),
                vector.len(),
            ));
        }
        Ok(())
    }
}

/// Factory for the similarity indexes of every namespace.
///
/// One backend is chosen at startup and shared by all namespaces.
#[async_trait]
pub trait SimilarityBackend: Send + Sync + 'static {
    /// Index type produced by this backend.
    type Index: SimilarityIndex;

    /// Backend name as written in configuration.
    fn name(&self) -> &'static str;

    /// Creates an empty index for a new namespace.
    async fn create(&self, namespace: &str, dimension: usize) -> VectorResult<Self::Index>;

    /// Restores the index of an existing namespace from `dir`.
    async fn load(&self, namespace: &str, dir: &Path, dimension: usize)
    -> VectorResult<Self::Index>;
}
