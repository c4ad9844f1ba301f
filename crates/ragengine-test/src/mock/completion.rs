//! Mock completion provider for testing.

use std::sync::{Arc, Mutex, PoisonError};

use ragengine_core::{CompletionProvider, CompletionRequest, CompletionResponse, Error, Result};

/// Canned answer returned by [`MockCompletionProvider`].
const DEFAULT_RESPONSE: &str = "This is a mock completion";

/// Mock completion provider for testing.
///
/// Every received request is recorded and can be inspected with
/// [`MockCompletionProvider::requests`].
#[derive(Clone, Debug)]
pub struct MockCompletionProvider {
    response: String,
    failing: bool,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl Default for MockCompletionProvider {
    fn default() -> Self {
        Self {
            response: DEFAULT_RESPONSE.to_owned(),
            failing: false,
            requests: Arc::default(),
        }
    }
}

impl MockCompletionProvider {
    /// Creates a provider answering with `response`.
    pub fn with_response(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            ..Self::default()
        }
    }

    /// Creates a provider whose calls always fail with an upstream error.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Returns every request received so far, oldest first.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the prompt of the most recent request.
    pub fn last_prompt(&self) -> Option<String> {
        self.requests().pop().map(|request| request.prompt)
    }
}

#[async_trait::async_trait]
impl CompletionProvider for MockCompletionProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);

        if self.failing {
            return Err(Error::upstream("mock completion backend unavailable"));
        }

        Ok(CompletionResponse::new(self.response.clone()))
    }
}
