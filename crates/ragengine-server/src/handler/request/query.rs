//! Query request types.

use ragengine_core::LlmParams;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Number of source nodes retrieved when the request does not say.
pub const DEFAULT_TOP_K: usize = 10;

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

/// Request payload for `POST /query`.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct QueryRequest {
    /// Namespace to search.
    #[validate(length(min = 1))]
    pub index_name: String,
    /// Question to answer.
    #[validate(length(min = 1))]
    pub query: String,
    /// Maximum number of source nodes.
    #[serde(default = "default_top_k")]
    #[validate(range(min = 1))]
    pub top_k: usize,
    /// Parameters forwarded to the inference backend.
    #[serde(default)]
    pub llm_params: Option<LlmParams>,
    /// Accepted and ignored.
    #[serde(default, skip_serializing)]
    pub rerank_params: Option<serde_json::Value>,
}

impl QueryRequest {
    /// Returns the parameter bag, empty when absent or `null`.
    pub fn llm_params(&mut self) -> LlmParams {
        self.llm_params.take().unwrap_or_default()
    }
}
