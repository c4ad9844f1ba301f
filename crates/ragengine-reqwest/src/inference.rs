//! Completion client for the configured inference endpoint.

use std::fmt;

use async_trait::async_trait;
use ragengine_core::{CompletionProvider, CompletionRequest, CompletionResponse, LlmParams};
use serde_json::{Map, Value, json};
use url::Url;

use crate::TRACING_TARGET_INFERENCE;
use crate::client::ReqwestClient;
use crate::error::{Error, Result};

/// URL prefix selecting [`InferenceBackend::OpenAi`].
pub const OPENAI_URL_PREFIX: &str = "https://api.openai.com";

/// URL prefix selecting [`InferenceBackend::HuggingFace`].
pub const HUGGINGFACE_URL_PREFIX: &str = "https://api-inference.huggingface.co";

/// Model sent to OpenAI when the call parameters name none.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";

const OPENAI_CHAT_PATH: &str = "/v1/chat/completions";

/// Request shape expected by the inference endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InferenceBackend {
    /// OpenAI chat completions.
    OpenAi,
    /// Hugging Face remote chat inference.
    HuggingFace,
    /// Any other endpoint accepting `{"prompt": ..., ...params}`.
    Custom,
}

impl InferenceBackend {
    /// Classifies an endpoint by its URL prefix.
    pub fn from_url(url: &str) -> Self {
        if url.starts_with(OPENAI_URL_PREFIX) {
            Self::OpenAi
        } else if url.starts_with(HUGGINGFACE_URL_PREFIX) {
            Self::HuggingFace
        } else {
            Self::Custom
        }
    }

    /// Returns the backend name used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::HuggingFace => "huggingface",
            Self::Custom => "custom",
        }
    }

    /// Builds the JSON body of one call.
    ///
    /// Call parameters are merged last and take precedence over the fields
    /// this method sets.
    pub fn request_body(self, prompt: String, params: LlmParams) -> Map<String, Value> {
        let mut body = Map::new();
        match self {
            Self::OpenAi => {
                body.insert("model".to_owned(), Value::from(DEFAULT_OPENAI_MODEL));
                body.insert("messages".to_owned(), user_messages(prompt));
            }
            Self::HuggingFace => {
                body.insert("messages".to_owned(), user_messages(prompt));
            }
            Self::Custom => {
                body.insert("prompt".to_owned(), Value::String(prompt));
            }
        }
        body.extend(params);
        body
    }

    /// Extracts the completion text from a successful reply.
    pub fn response_text(self, reply: Value) -> Result<String> {
        match self {
            Self::OpenAi => reply
                .pointer("/choices/0/message/content")
                .and_then(Value::as_str)
                .map(ToOwned::to_owned)
                .ok_or_else(|| {
                    Error::UnexpectedResponse(
                        "Unexpected response format. Expected choices[0].message.content."
                            .to_owned(),
                    )
                }),
            Self::HuggingFace | Self::Custom => Ok(match reply {
                Value::String(text) => text,
                other => other.to_string(),
            }),
        }
    }
}

fn user_messages(prompt: String) -> Value {
    json!([{ "role": "user", "content": prompt }])
}

/// [`CompletionProvider`] posting to one inference endpoint.
///
/// The request shape is chosen once, when the client is built.
#[derive(Clone)]
pub struct InferenceClient {
    client: ReqwestClient,
    backend: InferenceBackend,
    endpoint: String,
    access_secret: String,
}

impl InferenceClient {
    /// Creates a client for `url`, classifying it by prefix.
    pub fn new(client: ReqwestClient, url: &str, access_secret: impl Into<String>) -> Result<Self> {
        Self::with_backend(client, InferenceBackend::from_url(url), url, access_secret)
    }

    /// Creates a client with an explicit request shape.
    pub fn with_backend(
        client: ReqwestClient,
        backend: InferenceBackend,
        url: &str,
        access_secret: impl Into<String>,
    ) -> Result<Self> {
        let parsed = Url::parse(url).map_err(|source| Error::InvalidUrl {
            url: url.to_owned(),
            source,
        })?;

        let endpoint = if backend == InferenceBackend::OpenAi && parsed.path() == "/" {
            parsed
                .join(OPENAI_CHAT_PATH)
                .map_err(|source| Error::InvalidUrl {
                    url: url.to_owned(),
                    source,
                })?
                .into()
        } else {
            url.to_owned()
        };

        tracing::info!(
            target: TRACING_TARGET_INFERENCE,
            backend = backend.as_str(),
            endpoint = %endpoint,
            "Inference client configured"
        );

        Ok(Self {
            client,
            backend,
            endpoint,
            access_secret: access_secret.into(),
        })
    }

    /// Request shape in use.
    pub fn backend(&self) -> InferenceBackend {
        self.backend
    }

    /// URL every completion is posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl fmt::Debug for InferenceClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InferenceClient")
            .field("backend", &self.backend)
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CompletionProvider for InferenceClient {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> ragengine_core::Result<CompletionResponse> {
        let CompletionRequest { prompt, params } = request;
        let body = self.backend.request_body(prompt, params);

        tracing::debug!(
            target: TRACING_TARGET_INFERENCE,
            backend = self.backend.as_str(),
            fields = body.len(),
            "Requesting completion"
        );

        let reply = self
            .client
            .post_json(&self.endpoint, &self.access_secret, &body)
            .await?;
        let text = self.backend.response_text(reply)?;

        Ok(CompletionResponse::new(text))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use ragengine_core::ErrorKind;

    use super::*;
    use crate::config::ReqwestConfig;
    use crate::testing::StubServer;

    fn params(value: Value) -> LlmParams {
        match value {
            Value::Object(map) => map,
            _ => LlmParams::new(),
        }
    }

    fn http() -> anyhow::Result<ReqwestClient> {
        Ok(ReqwestClient::new(ReqwestConfig::default())?)
    }

    #[test]
    fn classifies_by_prefix() {
        assert_eq!(
            InferenceBackend::from_url("https://api.openai.com"),
            InferenceBackend::OpenAi
        );
        assert_eq!(
            InferenceBackend::from_url("https://api-inference.huggingface.co/models/x"),
            InferenceBackend::HuggingFace
        );
        assert_eq!(
            InferenceBackend::from_url("http://localhost:5000/chat"),
            InferenceBackend::Custom
        );
    }

    #[test]
    fn openai_endpoint_gets_chat_path() -> anyhow::Result<()> {
        let client = InferenceClient::new(http()?, "https://api.openai.com", "secret")?;
        assert_eq!(
            client.endpoint(),
            "https://api.openai.com/v1/chat/completions"
        );

        let invalid = InferenceClient::new(http()?, "not a url", "secret");
        assert!(matches!(invalid, Err(Error::InvalidUrl { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn custom_backend_stringifies_reply() -> anyhow::Result<()> {
        let server = StubServer::start(StatusCode::OK, json!({ "result": "ok" })).await?;
        let url = format!("{}/chat", server.url);
        let client = InferenceClient::new(http()?, &url, "secret")?;
        assert_eq!(client.backend(), InferenceBackend::Custom);

        let request = CompletionRequest::new("Hello")
            .with_params(params(json!({ "temperature": 0.5, "max_tokens": 10 })));
        let response = client.complete(request).await?;
        assert_eq!(response.text, r#"{"result":"ok"}"#);

        let recorded = server.requests();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].path, "/chat");
        assert_eq!(recorded[0].authorization.as_deref(), Some("Bearer secret"));
        assert_eq!(
            recorded[0].body,
            json!({ "prompt": "Hello", "temperature": 0.5, "max_tokens": 10 })
        );
        Ok(())
    }

    #[tokio::test]
    async fn params_do_not_leak_between_calls() -> anyhow::Result<()> {
        let server = StubServer::start(StatusCode::OK, json!("plain answer")).await?;
        let client = InferenceClient::new(http()?, &server.url, "secret")?;

        let first = CompletionRequest::new("one").with_params(params(json!({ "top_p": 0.9 })));
        let response = client.complete(first).await?;
        assert_eq!(response.text, "plain answer");
        client.complete(CompletionRequest::new("two")).await?;

        let recorded = server.requests();
        assert_eq!(recorded[1].body, json!({ "prompt": "two" }));
        Ok(())
    }

    #[tokio::test]
    async fn huggingface_backend_sends_messages() -> anyhow::Result<()> {
        let reply = json!([{ "generated_text": "Hi" }]);
        let server = StubServer::start(StatusCode::OK, reply.clone()).await?;
        let client = InferenceClient::with_backend(
            http()?,
            InferenceBackend::HuggingFace,
            &server.url,
            "hf-token",
        )?;

        let response = client.complete(CompletionRequest::new("Hello")).await?;
        assert_eq!(response.text, reply.to_string());

        let recorded = server.requests();
        assert_eq!(
            recorded[0].body,
            json!({ "messages": [{ "role": "user", "content": "Hello" }] })
        );
        assert_eq!(recorded[0].authorization.as_deref(), Some("Bearer hf-token"));
        Ok(())
    }

    #[tokio::test]
    async fn openai_backend_extracts_message_content() -> anyhow::Result<()> {
        let reply = json!({
            "choices": [{ "message": { "role": "assistant", "content": "Hi there" } }]
        });
        let server = StubServer::start(StatusCode::OK, reply).await?;
        let client =
            InferenceClient::with_backend(http()?, InferenceBackend::OpenAi, &server.url, "sk")?;

        let request =
            CompletionRequest::new("Hello").with_params(params(json!({ "model": "gpt-4o" })));
        let response = client.complete(request).await?;
        assert_eq!(response.text, "Hi there");

        let recorded = server.requests();
        assert_eq!(recorded[0].path, "/v1/chat/completions");
        assert_eq!(recorded[0].body["model"], "gpt-4o");
        assert_eq!(recorded[0].body["messages"][0]["content"], "Hello");
        Ok(())
    }

    #[tokio::test]
    async fn error_status_is_upstream_failure() -> anyhow::Result<()> {
        let server =
            StubServer::start(StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": "boom" })).await?;
        let client = InferenceClient::new(http()?, &server.url, "secret")?;

        let error = client
            .complete(CompletionRequest::new("Hello"))
            .await
            .err()
            .ok_or_else(|| anyhow::anyhow!("completion should fail"))?;
        assert_eq!(error.kind, ErrorKind::Upstream);
        assert!(error.to_string().contains("HTTP 500"));
        Ok(())
    }

    #[test]
    fn openai_reply_without_content_is_rejected() {
        let result = InferenceBackend::OpenAi.response_text(json!({ "choices": [] }));
        assert!(matches!(result, Err(Error::UnexpectedResponse(_))));
    }
}
