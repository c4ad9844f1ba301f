//! Facade the HTTP layer talks to.

use std::fmt;
use std::sync::Arc;

use ragengine_core::{CompletionProvider, Document, DocumentId, EmbeddingProvider, LlmParams};

use crate::TRACING_TARGET;
use crate::config::{BackendConfig, StoreConfig};
use crate::error::VectorResult;
use crate::flat::FlatBackend;
use crate::result::{DocumentInfo, IndexedDocuments, QueryResult};
use crate::store::{IndexStore, NamespacedStore};

/// Delegates every call to the [`IndexStore`] chosen at startup.
#[derive(Clone)]
pub struct VectorStoreManager {
    store: Arc<dyn IndexStore>,
}

impl VectorStoreManager {
    /// Wraps an already opened store.
    pub fn new(store: Arc<dyn IndexStore>) -> Self {
        Self { store }
    }

    /// Opens the store described by `config`.
    pub async fn from_config(
        config: &StoreConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        completion: Arc<dyn CompletionProvider>,
    ) -> VectorResult<Self> {
        let persist_dir = config.persist_dir.clone();
        let store: Arc<dyn IndexStore> = match &config.backend {
            BackendConfig::Faiss => Arc::new(
                NamespacedStore::open(FlatBackend::new(), embedder, completion, persist_dir)
                    .await?,
            ),
            #[cfg(feature = "qdrant")]
            BackendConfig::Qdrant(qdrant) => {
                let backend = crate::qdrant::QdrantBackend::new(qdrant).await?;
                Arc::new(NamespacedStore::open(backend, embedder, completion, persist_dir).await?)
            }
        };

        tracing::info!(
            target: TRACING_TARGET,
            backend = %config.backend.backend_name(),
            "Vector store manager initialized"
        );

        Ok(Self::new(store))
    }

    /// Indexes documents into `index_name`.
    pub async fn index(
        &self,
        index_name: &str,
        documents: Vec<Document>,
    ) -> VectorResult<Vec<DocumentId>> {
        self.store.index_documents(index_name, documents).await
    }

    /// Answers `query` over the documents of `index_name`.
    pub async fn query(
        &self,
        index_name: &str,
        query: &str,
        top_k: usize,
        llm_params: LlmParams,
    ) -> VectorResult<QueryResult> {
        self.store.query(index_name, query, top_k, llm_params).await
    }

    /// Lists every resident document.
    pub async fn list_all_indexed_documents(&self) -> IndexedDocuments {
        self.store.list_all_indexed_documents().await
    }

    /// Returns true if `doc_id` is stored in `index_name`.
    pub async fn document_exists(&self, index_name: &str, doc_id: &DocumentId) -> bool {
        self.store.document_exists(index_name, doc_id).await
    }

    /// Returns the nodes and metadata of one document.
    pub async fn get_document(
        &self,
        index_name: &str,
        doc_id: &DocumentId,
    ) -> VectorResult<DocumentInfo> {
        self.store.get_document(index_name, doc_id).await
    }

    /// Removes one document from `index_name`.
    pub async fn delete_document(&self, index_name: &str, doc_id: &DocumentId) -> VectorResult<()> {
        self.store.delete_document(index_name, doc_id).await
    }

    /// Replaces one document of `index_name`.
    pub async fn update_document(
        &self,
        index_name: &str,
        doc_id: &DocumentId,
        document: Document,
    ) -> VectorResult<()> {
        self.store.update_document(index_name, doc_id, document).await
    }

    /// Writes every namespace and the registry.
    pub async fn persist_all(&self) -> VectorResult<()> {
        self.store.persist_all().await
    }

    /// Name of the configured backend.
    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    /// Number of completed persistence writes since startup.
    pub fn persist_count(&self) -> u64 {
        self.store.persist_count()
    }
}

impl fmt::Debug for VectorStoreManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VectorStoreManager")
            .field("backend", &self.store.backend_name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use ragengine_test::{MockCompletionProvider, MockEmbeddingProvider};

    use super::*;

    #[tokio::test]
    async fn delegates_to_configured_store() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let config = StoreConfig::new(dir.path(), BackendConfig::Faiss);
        let manager = VectorStoreManager::from_config(
            &config,
            Arc::new(MockEmbeddingProvider::default()),
            Arc::new(MockCompletionProvider::default()),
        )
        .await?;
        assert_eq!(manager.backend_name(), "faiss");

        let inserted = manager
            .index("test_index", vec![Document::new("First document")])
            .await?;
        assert_eq!(inserted.len(), 1);
        assert!(manager.document_exists("test_index", &inserted[0]).await);
        assert_eq!(manager.persist_count(), 1);

        let result = manager
            .query("test_index", "First", 10, LlmParams::new())
            .await?;
        assert_eq!(result.source_nodes.len(), 1);
        Ok(())
    }
}
