//! Query response types.

use std::collections::BTreeMap;

use ragengine_core::Metadata;
use ragengine_vector::{QueryResult, SourceNode};
use serde::{Deserialize, Serialize};

/// Response for `POST /query`.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Completion text.
    pub response: String,
    /// Retrieved nodes, highest score first.
    pub source_nodes: Vec<SourceNode>,
    /// Metadata of each source node keyed by node id.
    pub metadata: BTreeMap<String, Metadata>,
}

impl From<QueryResult> for QueryResponse {
    fn from(result: QueryResult) -> Self {
        Self {
            response: result.response,
            source_nodes: result.source_nodes,
            metadata: result.metadata,
        }
    }
}
