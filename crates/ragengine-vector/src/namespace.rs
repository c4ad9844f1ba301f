//! One namespace: its docstore, node map and similarity index.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use ragengine_core::{Document, DocumentId, Metadata};
use serde::{Deserialize, Serialize};

use crate::error::{VectorError, VectorResult};
use crate::index::SimilarityIndex;
use crate::persist;
use crate::registry::RegistryEntry;

/// File holding the documents and nodes of one namespace.
pub const DOCSTORE_FILE: &str = "docstore.json";

const MAX_INDEX_NAME_LEN: usize = 128;

/// Checks that `name` can be used as a single directory component.
pub fn validate_index_name(name: &str) -> VectorResult<()> {
    let reason = if name.is_empty() {
        Some("must not be empty")
    } else if name.len() > MAX_INDEX_NAME_LEN {
        Some("must be at most 128 characters")
    } else if name == "." || name == ".." {
        Some("must not be a relative path component")
    } else if !name
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'-'))
    {
        Some("may only contain ASCII letters, digits, '.', '_' and '-'")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(VectorError::InvalidIndexName {
            name: name.to_owned(),
            reason,
        }),
        None => Ok(()),
    }
}

/// A document as held by a namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    /// Retrieval node carrying this document.
    pub node_id: String,
    /// Original text.
    pub text: String,
    /// Metadata as supplied at indexing time.
    #[serde(default)]
    pub metadata: Metadata,
    /// Digest over text and metadata.
    pub hash: String,
}

impl StoredDocument {
    pub(crate) fn new(node_id: String, document: Document) -> Self {
        let hash = document.content_hash();
        Self {
            node_id,
            text: document.text,
            metadata: document.metadata,
            hash,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct DocStore {
    documents: BTreeMap<DocumentId, StoredDocument>,
}

/// In-memory state of one namespace.
pub(crate) struct Namespace<I> {
    pub entry: RegistryEntry,
    docstore: DocStore,
    nodes: HashMap<String, DocumentId>,
    pub index: I,
}

impl<I: SimilarityIndex> Namespace<I> {
    pub fn new(entry: RegistryEntry, index: I) -> Self {
        Self {
            entry,
            docstore: DocStore::default(),
            nodes: HashMap::new(),
            index,
        }
    }

    /// Restores the docstore from `dir`; the index is restored by the caller.
    pub async fn load(entry: RegistryEntry, dir: &Path, index: I) -> VectorResult<Self> {
        let docstore: DocStore = persist::read_json(&dir.join(DOCSTORE_FILE))
            .await?
            .unwrap_or_default();
        let nodes = docstore
            .documents
            .iter()
            .map(|(doc_id, doc)| (doc.node_id.clone(), doc_id.clone()))
            .collect();

        Ok(Self {
            entry,
            docstore,
            nodes,
            index,
        })
    }

    pub fn contains(&self, doc_id: &DocumentId) -> bool {
        self.docstore.documents.contains_key(doc_id)
    }

    pub fn get(&self, doc_id: &DocumentId) -> Option<&StoredDocument> {
        self.docstore.documents.get(doc_id)
    }

    pub fn documents(&self) -> impl Iterator<Item = (&DocumentId, &StoredDocument)> {
        self.docstore.documents.iter()
    }

    pub fn len(&self) -> usize {
        self.docstore.documents.len()
    }

    /// Resolves a retrieval node back to its document.
    pub fn node(&self, node_id: &str) -> Option<&StoredDocument> {
        self.nodes
            .get(node_id)
            .and_then(|doc_id| self.docstore.documents.get(doc_id))
    }

    /// Records a document whose vector has already been inserted.
    pub fn insert(&mut self, doc_id: DocumentId, document: StoredDocument) {
        self.nodes.insert(document.node_id.clone(), doc_id.clone());
        self.docstore.documents.insert(doc_id, document);
    }

    /// Forgets a document; the caller removes its vector.
    pub fn remove(&mut self, doc_id: &DocumentId) -> Option<StoredDocument> {
        let document = self.docstore.documents.remove(doc_id)?;
        self.nodes.remove(&document.node_id);
        Some(document)
    }

    /// Writes the docstore and the backend payload into `dir`.
    pub async fn persist(&self, dir: &Path) -> VectorResult<()> {
        persist::write_json(&dir.join(DOCSTORE_FILE), &self.docstore).await?;
        self.index.persist(dir).await
    }
}

/// Directory of namespace `name` under `persist_dir`.
pub(crate) fn namespace_dir(persist_dir: &Path, name: &str) -> PathBuf {
    persist_dir.join(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_safe_names() {
        for name in ["test_index", "index1", "a.b-c", "X"] {
            assert!(validate_index_name(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn rejects_path_like_names() {
        let long = "a".repeat(129);
        for name in ["", ".", "..", "a/b", "..\\x", "with space", long.as_str()] {
            assert!(
                matches!(
                    validate_index_name(name),
                    Err(VectorError::InvalidIndexName { .. })
                ),
                "{name}"
            );
        }
    }
}
