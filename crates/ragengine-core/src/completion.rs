//! Completion provider abstraction.
//!
//! A completion call is described by an owned [`CompletionRequest`]. The
//! per-call parameter bag travels inside the request and is consumed by the
//! provider, so it is gone once the call returns, whether it succeeded or
//! not. Concurrent calls never see each other's parameters.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Per-call parameters forwarded to the inference backend.
pub type LlmParams = serde_json::Map<String, serde_json::Value>;

/// One completion call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Fully rendered prompt.
    pub prompt: String,
    /// Backend parameters (model, temperature, max tokens, ...).
    #[serde(default)]
    pub params: LlmParams,
}

impl CompletionRequest {
    /// Creates a request without parameters.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            params: LlmParams::new(),
        }
    }

    /// Stages the parameter bag for this call.
    pub fn with_params(mut self, params: LlmParams) -> Self {
        self.params = params;
        self
    }
}

/// Text produced by a completion backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Completion text.
    pub text: String,
}

impl CompletionResponse {
    /// Creates a response.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Produces a text completion for a prompt.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Sends `request` to the backend. No retries are attempted.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn request_builder_stages_params() {
        let mut params = LlmParams::new();
        params.insert("temperature".into(), json!(0.7));

        let request = CompletionRequest::new("Hello").with_params(params);
        assert_eq!(request.prompt, "Hello");
        assert_eq!(request.params.get("temperature"), Some(&json!(0.7)));
    }
}
