//! Qdrant backend implementation.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::vectors_config::Config as VectorsConfig;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, PointId, PointStruct, SearchPointsBuilder,
    UpsertPointsBuilder, VectorParamsBuilder,
};

use super::QdrantConfig;
use crate::TRACING_TARGET;
use crate::error::{VectorError, VectorResult};
use crate::index::{ScoredNode, SimilarityBackend, SimilarityIndex};

const BACKEND_NAME: &str = "qdrant";

/// Creates one Qdrant collection per namespace.
pub struct QdrantBackend {
    client: Arc<Qdrant>,
    config: QdrantConfig,
}

impl QdrantBackend {
    /// Connects to the configured Qdrant endpoint.
    pub async fn new(config: &QdrantConfig) -> VectorResult<Self> {
        let client = Qdrant::from_url(&config.url)
            .api_key(config.api_key.clone())
            .build()
            .map_err(|e| VectorError::connection(e.to_string()))?;

        tracing::debug!(
            target: TRACING_TARGET,
            url = %config.url,
            "Connected to Qdrant"
        );

        Ok(Self {
            client: Arc::new(client),
            config: config.clone(),
        })
    }

    /// Ensures a collection exists, creating it if necessary.
    async fn ensure_collection(&self, name: &str, dimension: usize) -> VectorResult<()> {
        let exists = self
            .client
            .collection_exists(name)
            .await
            .map_err(|e| VectorError::backend(e.to_string()))?;

        if !exists {
            let vectors_config = VectorsConfig::Params(
                VectorParamsBuilder::new(dimension as u64, Distance::Cosine).build(),
            );

            self.client
                .create_collection(CreateCollectionBuilder::new(name).vectors_config(vectors_config))
                .await
                .map_err(|e| VectorError::backend(e.to_string()))?;

            tracing::info!(
                target: TRACING_TARGET,
                collection = %name,
                dimension,
                "Created Qdrant collection"
            );
        }

        Ok(())
    }

    fn index(&self, collection: String, dimension: usize) -> QdrantIndex {
        QdrantIndex {
            client: Arc::clone(&self.client),
            collection,
            dimension,
        }
    }
}

#[async_trait]
impl SimilarityBackend for QdrantBackend {
    type Index = QdrantIndex;

    fn name(&self) -> &'static str {
        BACKEND_NAME
    }

    async fn create(&self, namespace: &str, dimension: usize) -> VectorResult<QdrantIndex> {
        let collection = self.config.collection_name(namespace);
        self.ensure_collection(&collection, dimension).await?;
        Ok(self.index(collection, dimension))
    }

    async fn load(
        &self,
        namespace: &str,
        _dir: &Path,
        dimension: usize,
    ) -> VectorResult<QdrantIndex> {
        let collection = self.config.collection_name(namespace);
        self.ensure_collection(&collection, dimension).await?;
        Ok(self.index(collection, dimension))
    }
}

/// Similarity index stored in a Qdrant collection.
///
/// Vectors live server-side, so persisting the namespace writes nothing for
/// the index itself.
pub struct QdrantIndex {
    client: Arc<Qdrant>,
    collection: String,
    dimension: usize,
}

impl QdrantIndex {
    /// Extracts point ID as a string.
    fn extract_point_id(id: Option<PointId>) -> Option<String> {
        use qdrant_client::qdrant::point_id::PointIdOptions;

        match id {
            Some(PointId {
                point_id_options: Some(id),
            }) => match id {
                PointIdOptions::Num(n) => Some(n.to_string()),
                PointIdOptions::Uuid(s) => Some(s),
            },
            _ => None,
        }
    }
}

#[async_trait]
impl SimilarityIndex for QdrantIndex {
    fn backend_name(&self) -> &'static str {
        BACKEND_NAME
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn insert(&mut self, nodes: Vec<(String, Vec<f32>)>) -> VectorResult<()> {
        if nodes.is_empty() {
            return Ok(());
        }

        let mut points = Vec::with_capacity(nodes.len());
        for (node_id, embedding) in nodes {
            self.check_dimension(&embedding)?;
            let payload: HashMap<String, qdrant_client::qdrant::Value> = HashMap::new();
            points.push(PointStruct::new(node_id, embedding, payload));
        }

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, points).wait(true))
            .await
            .map_err(|e| VectorError::backend(e.to_string()))?;

        Ok(())
    }

    async fn search(&self, query: &[f32], top_k: usize) -> VectorResult<Vec<ScoredNode>> {
        self.check_dimension(query)?;

        let search = SearchPointsBuilder::new(&self.collection, query.to_vec(), top_k as u64);
        let response = self
            .client
            .search_points(search)
            .await
            .map_err(|e| VectorError::backend(e.to_string()))?;

        Ok(response
            .result
            .into_iter()
            .filter_map(|point| {
                Self::extract_point_id(point.id).map(|id| ScoredNode::new(id, point.score))
            })
            .collect())
    }

    async fn persist(&self, _dir: &Path) -> VectorResult<()> {
        Ok(())
    }
}
