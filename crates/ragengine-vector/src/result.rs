//! Values returned by [`IndexStore`](crate::IndexStore) operations.

use std::collections::BTreeMap;

use ragengine_core::{DocumentId, Metadata};
use serde::{Deserialize, Serialize};

/// A retrieved node as reported to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceNode {
    pub node_id: String,
    pub text: String,
    pub score: f32,
    pub metadata: Metadata,
}

/// Outcome of a retrieval-augmented query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    /// Completion text produced by the inference backend.
    pub response: String,
    /// Retrieved nodes, highest score first.
    pub source_nodes: Vec<SourceNode>,
    /// Metadata of every source node keyed by node id.
    pub metadata: BTreeMap<String, Metadata>,
}

/// Stored text and content hash of one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub text: String,
    pub hash: String,
}

/// Nodes and metadata of one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub node_ids: Vec<String>,
    pub metadata: Metadata,
}

/// Every resident document grouped by namespace.
pub type IndexedDocuments = BTreeMap<String, BTreeMap<DocumentId, DocumentSummary>>;
