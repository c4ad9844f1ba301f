//! Namespaced index store.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use ragengine_core::{
    CompletionProvider, CompletionRequest, Document, DocumentId, EmbeddingProvider, Error,
    LlmParams,
};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{VectorError, VectorResult};
use crate::index::{SimilarityBackend, SimilarityIndex};
use crate::namespace::{Namespace, StoredDocument, namespace_dir, validate_index_name};
use crate::prompt::{node_context, render_prompt};
use crate::registry::{IndexRegistry, RegistryEntry};
use crate::result::{DocumentInfo, DocumentSummary, IndexedDocuments, QueryResult, SourceNode};
use crate::{TRACING_TARGET, TRACING_TARGET_PERSIST};

/// Storage seam between the HTTP surface and a similarity backend.
#[async_trait]
pub trait IndexStore: Send + Sync {
    /// Name of the configured similarity backend.
    fn backend_name(&self) -> &'static str;

    /// Adds documents to `index_name`, creating the namespace on first use.
    ///
    /// Returns the identifiers of the documents actually inserted, in input
    /// order. Documents already present are skipped.
    async fn index_documents(
        &self,
        index_name: &str,
        documents: Vec<Document>,
    ) -> VectorResult<Vec<DocumentId>>;

    /// Retrieves up to `top_k` nodes for `query` and asks the completion
    /// backend to answer it over their context.
    async fn query(
        &self,
        index_name: &str,
        query: &str,
        top_k: usize,
        llm_params: LlmParams,
    ) -> VectorResult<QueryResult>;

    /// Returns true if `doc_id` is stored in `index_name`.
    ///
    /// A missing namespace is logged and reported as `false`.
    async fn document_exists(&self, index_name: &str, doc_id: &DocumentId) -> bool;

    /// Returns every resident document grouped by namespace.
    async fn list_all_indexed_documents(&self) -> IndexedDocuments;

    /// Returns the nodes and metadata of one document.
    async fn get_document(&self, index_name: &str, doc_id: &DocumentId)
    -> VectorResult<DocumentInfo>;

    /// Removes one document from one namespace.
    async fn delete_document(&self, index_name: &str, doc_id: &DocumentId) -> VectorResult<()>;

    /// Replaces a stored document.
    async fn update_document(
        &self,
        _index_name: &str,
        _doc_id: &DocumentId,
        _document: Document,
    ) -> VectorResult<()> {
        Err(VectorError::unsupported(
            "update_document",
            self.backend_name(),
        ))
    }

    /// Writes one namespace and the registry.
    async fn persist(&self, index_name: &str) -> VectorResult<()>;

    /// Writes every resident namespace and the registry.
    async fn persist_all(&self) -> VectorResult<()>;

    /// Number of completed persistence writes since startup.
    fn persist_count(&self) -> u64;
}

struct StoreState<I> {
    namespaces: BTreeMap<String, Namespace<I>>,
}

impl<I> StoreState<I> {
    fn registry(&self) -> IndexRegistry {
        IndexRegistry {
            indexes: self
                .namespaces
                .iter()
                .map(|(name, namespace)| (name.clone(), namespace.entry.clone()))
                .collect(),
        }
    }
}

/// [`IndexStore`] holding every namespace in memory over one backend.
///
/// A single read-write lock guards the namespace map together with the
/// on-disk tree: mutations and persistence take it exclusively, reads share
/// it. The completion call of a query runs with no lock held.
pub struct NamespacedStore<B: SimilarityBackend> {
    backend: B,
    embedder: Arc<dyn EmbeddingProvider>,
    completion: Arc<dyn CompletionProvider>,
    persist_dir: PathBuf,
    dimension: usize,
    state: RwLock<StoreState<B::Index>>,
    persist_count: AtomicU64,
}

impl<B: SimilarityBackend> NamespacedStore<B> {
    /// Probes the embedding dimension and loads every registered namespace.
    pub async fn open(
        backend: B,
        embedder: Arc<dyn EmbeddingProvider>,
        completion: Arc<dyn CompletionProvider>,
        persist_dir: impl Into<PathBuf>,
    ) -> VectorResult<Self> {
        let persist_dir = persist_dir.into();
        let dimension = embedder.embedding_dimension().await?;
        let registry = IndexRegistry::load(&persist_dir).await?;

        let mut namespaces = BTreeMap::new();
        for (name, entry) in registry.indexes {
            let loaded =
                Self::load_namespace(&backend, &persist_dir, &name, entry, dimension).await?;
            if let Some(namespace) = loaded {
                namespaces.insert(name, namespace);
            }
        }

        tracing::info!(
            target: TRACING_TARGET,
            backend = backend.name(),
            persist_dir = %persist_dir.display(),
            dimension,
            namespaces = namespaces.len(),
            "Index store opened"
        );

        Ok(Self {
            backend,
            embedder,
            completion,
            persist_dir,
            dimension,
            state: RwLock::new(StoreState { namespaces }),
            persist_count: AtomicU64::new(0),
        })
    }

    async fn load_namespace(
        backend: &B,
        persist_dir: &Path,
        name: &str,
        entry: RegistryEntry,
        dimension: usize,
    ) -> VectorResult<Option<Namespace<B::Index>>> {
        if let Err(error) = validate_index_name(name) {
            tracing::warn!(
                target: TRACING_TARGET,
                index_name = %name,
                error = %error,
                "Skipping registered namespace"
            );
            return Ok(None);
        }

        let dir = namespace_dir(persist_dir, name);
        let exists = tokio::fs::try_exists(&dir)
            .await
            .map_err(|e| VectorError::persistence(&dir, e))?;
        if !exists {
            tracing::warn!(
                target: TRACING_TARGET,
                index_name = %name,
                path = %dir.display(),
                "Registered namespace has no directory, skipping"
            );
            return Ok(None);
        }

        if entry.backend != backend.name() {
            return Err(VectorError::invalid_config(format!(
                "namespace '{name}' was created by the {} backend, but {} is configured",
                entry.backend,
                backend.name()
            )));
        }
        if entry.dimension != dimension {
            return Err(VectorError::dimension_mismatch(entry.dimension, dimension));
        }

        let index = backend.load(name, &dir, dimension).await?;
        let namespace = Namespace::load(entry, &dir, index).await?;

        tracing::debug!(
            target: TRACING_TARGET,
            index_name = %name,
            documents = namespace.len(),
            "Loaded namespace"
        );

        Ok(Some(namespace))
    }

    /// Embedding dimension shared by every namespace.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Root directory of the persisted tree.
    pub fn persist_dir(&self) -> &Path {
        &self.persist_dir
    }

    async fn persist_locked(
        &self,
        state: &StoreState<B::Index>,
        index_name: &str,
    ) -> VectorResult<()> {
        let namespace = state
            .namespaces
            .get(index_name)
            .ok_or_else(|| VectorError::index_not_found(index_name))?;

        namespace
            .persist(&namespace_dir(&self.persist_dir, index_name))
            .await?;
        state.registry().save(&self.persist_dir).await?;
        self.persist_count.fetch_add(1, Ordering::SeqCst);

        tracing::info!(
            target: TRACING_TARGET_PERSIST,
            index_name = %index_name,
            "Persisted namespace"
        );

        Ok(())
    }
}

/// Forgets a batch whose persistence failed, so memory matches the disk.
async fn rollback_batch<I: SimilarityIndex>(
    state: &mut StoreState<I>,
    index_name: &str,
    created: bool,
    inserted: &[DocumentId],
) {
    tracing::warn!(
        target: TRACING_TARGET_PERSIST,
        index_name = %index_name,
        documents = inserted.len(),
        created,
        "Persistence failed, rolling back batch"
    );

    if created {
        state.namespaces.remove(index_name);
        return;
    }

    let Some(namespace) = state.namespaces.get_mut(index_name) else {
        return;
    };
    let node_ids: Vec<String> = inserted
        .iter()
        .filter_map(|doc_id| namespace.remove(doc_id))
        .map(|document| document.node_id)
        .collect();

    // Orphaned vectors never resolve to a document, so a failed removal is only logged.
    if let Err(error) = namespace.index.remove(&node_ids).await {
        tracing::warn!(
            target: TRACING_TARGET_PERSIST,
            index_name = %index_name,
            error = %error,
            "Could not remove vectors of rolled back batch"
        );
    }
}

impl<B: SimilarityBackend> fmt::Debug for NamespacedStore<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamespacedStore")
            .field("backend", &self.backend.name())
            .field("persist_dir", &self.persist_dir)
            .field("dimension", &self.dimension)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<B: SimilarityBackend> IndexStore for NamespacedStore<B> {
    fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    async fn index_documents(
        &self,
        index_name: &str,
        documents: Vec<Document>,
    ) -> VectorResult<Vec<DocumentId>> {
        validate_index_name(index_name)?;
        let mut state = self.state.write().await;

        let existing = state.namespaces.get(index_name);
        let mut seen = HashSet::new();
        let mut pending = Vec::with_capacity(documents.len());
        for document in documents {
            let doc_id = document.doc_id();
            if existing.is_some_and(|namespace| namespace.contains(&doc_id)) {
                tracing::info!(
                    target: TRACING_TARGET,
                    index_name = %index_name,
                    doc_id = %doc_id,
                    "Document already exists, skipping"
                );
                continue;
            }
            if !seen.insert(doc_id.clone()) {
                tracing::debug!(
                    target: TRACING_TARGET,
                    index_name = %index_name,
                    doc_id = %doc_id,
                    "Duplicate document in batch, skipping"
                );
                continue;
            }
            pending.push((doc_id, document));
        }

        if pending.is_empty() {
            tracing::info!(
                target: TRACING_TARGET,
                index_name = %index_name,
                "No new documents to index"
            );
            return Ok(Vec::new());
        }

        let texts: Vec<String> = pending.iter().map(|(_, doc)| doc.text.clone()).collect();
        let embeddings = self.embedder.embed_texts(&texts).await?;
        if embeddings.len() != pending.len() {
            return Err(Error::malformed_response(format!(
                "expected {} embeddings, got {}",
                pending.len(),
                embeddings.len()
            ))
            .into());
        }
        if let Some(embedding) = embeddings.iter().find(|e| e.len() != self.dimension) {
            return Err(VectorError::dimension_mismatch(
                self.dimension,
                embedding.len(),
            ));
        }

        let created = !state.namespaces.contains_key(index_name);
        if created {
            let index = self.backend.create(index_name, self.dimension).await?;
            let entry = RegistryEntry::new(self.backend.name(), self.dimension);
            state
                .namespaces
                .insert(index_name.to_owned(), Namespace::new(entry, index));
            tracing::info!(
                target: TRACING_TARGET,
                index_name = %index_name,
                "Created namespace"
            );
        }

        let node_ids: Vec<String> = pending
            .iter()
            .map(|_| Uuid::new_v4().to_string())
            .collect();
        let nodes = node_ids.iter().cloned().zip(embeddings).collect();

        let Some(namespace) = state.namespaces.get_mut(index_name) else {
            return Err(VectorError::index_not_found(index_name));
        };
        let outcome = namespace.index.insert(nodes).await;
        if let Err(error) = outcome {
            if created {
                state.namespaces.remove(index_name);
            }
            return Err(error);
        }

        let mut inserted = Vec::with_capacity(pending.len());
        for ((doc_id, document), node_id) in pending.into_iter().zip(node_ids) {
            namespace.insert(doc_id.clone(), StoredDocument::new(node_id, document));
            inserted.push(doc_id);
        }

        tracing::info!(
            target: TRACING_TARGET,
            index_name = %index_name,
            inserted = inserted.len(),
            created,
            "Indexed documents"
        );

        if let Err(error) = self.persist_locked(&state, index_name).await {
            rollback_batch(&mut state, index_name, created, &inserted).await;
            return Err(error);
        }
        Ok(inserted)
    }

    async fn query(
        &self,
        index_name: &str,
        query: &str,
        top_k: usize,
        llm_params: LlmParams,
    ) -> VectorResult<QueryResult> {
        if top_k == 0 {
            return Err(VectorError::InvalidArgument(
                "top_k must be at least 1".to_owned(),
            ));
        }
        if !self.state.read().await.namespaces.contains_key(index_name) {
            return Err(VectorError::index_not_found(index_name));
        }

        let embedding = self.embedder.embed_text(query).await?;

        let source_nodes = {
            let state = self.state.read().await;
            let namespace = state
                .namespaces
                .get(index_name)
                .ok_or_else(|| VectorError::index_not_found(index_name))?;

            let hits = namespace.index.search(&embedding, top_k).await?;
            let mut source_nodes = Vec::with_capacity(hits.len());
            for hit in hits {
                match namespace.node(&hit.node_id) {
                    Some(document) => source_nodes.push(SourceNode {
                        node_id: hit.node_id,
                        text: document.text.clone(),
                        score: hit.score,
                        metadata: document.metadata.clone(),
                    }),
                    None => tracing::warn!(
                        target: TRACING_TARGET,
                        index_name = %index_name,
                        node_id = %hit.node_id,
                        "Retrieved node has no document"
                    ),
                }
            }
            source_nodes
        };

        let contexts: Vec<String> = source_nodes
            .iter()
            .map(|node| node_context(&node.text, &node.metadata))
            .collect();
        let prompt = render_prompt(contexts.iter().map(String::as_str), query);

        tracing::debug!(
            target: TRACING_TARGET,
            index_name = %index_name,
            top_k,
            retrieved = source_nodes.len(),
            "Requesting completion"
        );

        let request = CompletionRequest::new(prompt).with_params(llm_params);
        let response = self.completion.complete(request).await?;

        let metadata = source_nodes
            .iter()
            .map(|node| (node.node_id.clone(), node.metadata.clone()))
            .collect();

        Ok(QueryResult {
            response: response.text,
            source_nodes,
            metadata,
        })
    }

    async fn document_exists(&self, index_name: &str, doc_id: &DocumentId) -> bool {
        let state = self.state.read().await;
        match state.namespaces.get(index_name) {
            Some(namespace) => namespace.contains(doc_id),
            None => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    index_name = %index_name,
                    doc_id = %doc_id,
                    "No such index"
                );
                false
            }
        }
    }

    async fn list_all_indexed_documents(&self) -> IndexedDocuments {
        let state = self.state.read().await;
        state
            .namespaces
            .iter()
            .map(|(name, namespace)| {
                let documents = namespace
                    .documents()
                    .map(|(doc_id, document)| {
                        let summary = DocumentSummary {
                            text: document.text.clone(),
                            hash: document.hash.clone(),
                        };
                        (doc_id.clone(), summary)
                    })
                    .collect();
                (name.clone(), documents)
            })
            .collect()
    }

    async fn get_document(
        &self,
        index_name: &str,
        doc_id: &DocumentId,
    ) -> VectorResult<DocumentInfo> {
        let state = self.state.read().await;
        let namespace = state
            .namespaces
            .get(index_name)
            .ok_or_else(|| VectorError::index_not_found(index_name))?;
        let document = namespace
            .get(doc_id)
            .ok_or_else(|| VectorError::document_not_found(index_name, doc_id.clone()))?;

        Ok(DocumentInfo {
            node_ids: vec![document.node_id.clone()],
            metadata: document.metadata.clone(),
        })
    }

    async fn delete_document(&self, index_name: &str, doc_id: &DocumentId) -> VectorResult<()> {
        let mut state = self.state.write().await;
        let namespace = state
            .namespaces
            .get_mut(index_name)
            .ok_or_else(|| VectorError::index_not_found(index_name))?;
        let node_id = namespace
            .get(doc_id)
            .map(|document| document.node_id.clone())
            .ok_or_else(|| VectorError::document_not_found(index_name, doc_id.clone()))?;

        namespace.index.remove(&[node_id]).await?;
        namespace.remove(doc_id);

        tracing::info!(
            target: TRACING_TARGET,
            index_name = %index_name,
            doc_id = %doc_id,
            "Deleted document"
        );

        self.persist_locked(&state, index_name).await
    }

    async fn persist(&self, index_name: &str) -> VectorResult<()> {
        let state = self.state.write().await;
        self.persist_locked(&state, index_name).await
    }

    async fn persist_all(&self) -> VectorResult<()> {
        let state = self.state.write().await;
        for (name, namespace) in &state.namespaces {
            namespace
                .persist(&namespace_dir(&self.persist_dir, name))
                .await?;
        }
        state.registry().save(&self.persist_dir).await?;
        self.persist_count.fetch_add(1, Ordering::SeqCst);

        tracing::info!(
            target: TRACING_TARGET_PERSIST,
            namespaces = state.namespaces.len(),
            "Persisted all namespaces"
        );

        Ok(())
    }

    fn persist_count(&self) -> u64 {
        self.persist_count.load(Ordering::SeqCst)
    }
}
