//! Exhaustive in-process L2 index.
//!
//! Registered under the `faiss` backend name: the search contract matches a
//! flat L2 FAISS index (squared euclidean distance, no approximation), and
//! the vectors are persisted next to the namespace docstore.

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET;
use crate::error::{VectorError, VectorResult};
use crate::index::{ScoredNode, SimilarityBackend, SimilarityIndex};
use crate::persist;

/// File holding the vectors of one namespace.
pub const VECTOR_STORE_FILE: &str = "vector_store.json";

/// Backend name of the flat index.
pub const BACKEND_NAME: &str = "faiss";

/// Creates and restores [`FlatIndex`]es.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatBackend;

impl FlatBackend {
    /// Creates the backend.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SimilarityBackend for FlatBackend {
    type Index = FlatIndex;

    fn name(&self) -> &'static str {
        BACKEND_NAME
    }

    async fn create(&self, _namespace: &str, dimension: usize) -> VectorResult<FlatIndex> {
        Ok(FlatIndex::new(dimension))
    }

    async fn load(&self, namespace: &str, dir: &Path, dimension: usize) -> VectorResult<FlatIndex> {
        let path = dir.join(VECTOR_STORE_FILE);
        let index: FlatIndex = persist::read_json(&path)
            .await?
            .unwrap_or_else(|| FlatIndex::new(dimension));

        if index.dimension != dimension {
            return Err(VectorError::dimension_mismatch(dimension, index.dimension));
        }

        tracing::debug!(
            target: TRACING_TARGET,
            index_name = %namespace,
            vectors = index.len(),
            "Loaded flat index"
        );

        Ok(index)
    }
}

/// Stored vector of a single node.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct FlatEntry {
    node_id: String,
    embedding: Vec<f32>,
}

/// Flat index over squared L2 distance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlatIndex {
    dimension: usize,
    entries: Vec<FlatEntry>,
}

impl FlatIndex {
    /// Creates an empty index.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            entries: Vec::new(),
        }
    }

    /// Number of stored vectors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no vectors are stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Squared euclidean distance.
fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

#[async_trait]
impl SimilarityIndex for FlatIndex {
    fn backend_name(&self) -> &'static str {
        BACKEND_NAME
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn insert(&mut self, nodes: Vec<(String, Vec<f32>)>) -> VectorResult<()> {
        for (_, embedding) in &nodes {
            self.check_dimension(embedding)?;
        }

        self.entries.extend(
            nodes
                .into_iter()
                .map(|(node_id, embedding)| FlatEntry { node_id, embedding }),
        );
        Ok(())
    }

    async fn search(&self, query: &[f32], top_k: usize) -> VectorResult<Vec<ScoredNode>> {
        self.check_dimension(query)?;

        let mut ranked: Vec<(f32, &FlatEntry)> = self
            .entries
            .iter()
            .map(|entry| (squared_l2(query, &entry.embedding), entry))
            .collect();
        // Stable: equal distances keep insertion order.
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0));

        Ok(ranked
            .into_iter()
            .take(top_k)
            .map(|(distance, entry)| ScoredNode::new(&entry.node_id, 1.0 / (1.0 + distance)))
            .collect())
    }

    async fn remove(&mut self, node_ids: &[String]) -> VectorResult<()> {
        self.entries
            .retain(|entry| !node_ids.iter().any(|id| *id == entry.node_id));
        Ok(())
    }

    async fn persist(&self, dir: &Path) -> VectorResult<()> {
        persist::write_json(&dir.join(VECTOR_STORE_FILE), self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, embedding: &[f32]) -> (String, Vec<f32>) {
        (id.to_owned(), embedding.to_vec())
    }

    #[tokio::test]
    async fn search_ranks_by_distance() -> anyhow::Result<()> {
        let mut index = FlatIndex::new(2);
        index
            .insert(vec![
                node("far", &[10.0, 10.0]),
                node("near", &[1.0, 0.0]),
                node("exact", &[0.0, 0.0]),
            ])
            .await?;

        let hits = index.search(&[0.0, 0.0], 2).await?;
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0], ScoredNode::new("exact", 1.0));
        assert_eq!(hits[1], ScoredNode::new("near", 0.5));
        Ok(())
    }

    #[tokio::test]
    async fn top_k_is_clamped_to_size() -> anyhow::Result<()> {
        let mut index = FlatIndex::new(1);
        index.insert(vec![node("a", &[1.0])]).await?;
        assert_eq!(index.search(&[0.0], 10).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn rejects_wrong_dimension() {
        let mut index = FlatIndex::new(3);
        let result = index.insert(vec![node("a", &[1.0])]).await;
        assert!(matches!(
            result,
            Err(VectorError::DimensionMismatch {
                expected: 3,
                actual: 1
            })
        ));
    }

    #[tokio::test]
    async fn remove_drops_only_named_nodes() -> anyhow::Result<()> {
        let mut index = FlatIndex::new(1);
        index
            .insert(vec![node("a", &[1.0]), node("b", &[2.0])])
            .await?;
        index.remove(&["a".to_owned()]).await?;

        let hits = index.search(&[1.0], 5).await?;
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].node_id, "b");
        Ok(())
    }

    #[tokio::test]
    async fn persists_and_loads() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let mut index = FlatIndex::new(2);
        index.insert(vec![node("a", &[0.5, 0.5])]).await?;
        index.persist(dir.path()).await?;

        let loaded = FlatBackend::new().load("ns", dir.path(), 2).await?;
        assert_eq!(loaded.len(), 1);
        assert!(dir.path().join(VECTOR_STORE_FILE).exists());

        let mismatch = FlatBackend::new().load("ns", dir.path(), 3).await;
        assert!(mismatch.is_err());
        Ok(())
    }
}
