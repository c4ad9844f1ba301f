//! Embedding provider backed by a remote HTTP endpoint.

use std::fmt;

use async_trait::async_trait;
use ragengine_core::EmbeddingProvider;
use serde_json::{Value, json};

use crate::TRACING_TARGET_EMBEDDING;
use crate::client::ReqwestClient;
use crate::error::{Error, Result};

const UNEXPECTED_FORMAT: &str = "Unexpected response format. Expected a list.";

/// Embeds text by posting `{"inputs": text}` to a remote model.
#[derive(Clone)]
pub struct RemoteEmbedding {
    client: ReqwestClient,
    url: String,
    access_secret: String,
}

impl RemoteEmbedding {
    /// Creates a provider for the endpoint at `url`.
    pub fn new(
        client: ReqwestClient,
        url: impl Into<String>,
        access_secret: impl Into<String>,
    ) -> Self {
        Self {
            client,
            url: url.into(),
            access_secret: access_secret.into(),
        }
    }

    /// Endpoint the provider posts to.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl fmt::Debug for RemoteEmbedding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteEmbedding")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

/// Reads a flat list of numbers, also accepting a single nested list.
fn parse_embedding(reply: Value) -> Result<Vec<f32>> {
    let Value::Array(items) = reply else {
        return Err(Error::UnexpectedResponse(UNEXPECTED_FORMAT.to_owned()));
    };

    let items = match <[Value; 1]>::try_from(items) {
        Ok([Value::Array(inner)]) => inner,
        Ok([single]) => vec![single],
        Err(items) => items,
    };

    items
        .iter()
        .map(|item| item.as_f64().map(|n| n as f32))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| Error::UnexpectedResponse(UNEXPECTED_FORMAT.to_owned()))
}

#[async_trait]
impl EmbeddingProvider for RemoteEmbedding {
    async fn embed_text(&self, text: &str) -> ragengine_core::Result<Vec<f32>> {
        tracing::trace!(
            target: TRACING_TARGET_EMBEDDING,
            url = %self.url,
            chars = text.len(),
            "Requesting embedding"
        );

        let body = json!({ "inputs": text });
        let reply = self
            .client
            .post_json(&self.url, &self.access_secret, &body)
            .await?;

        Ok(parse_embedding(reply)?)
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use ragengine_core::ErrorKind;

    use super::*;
    use crate::config::ReqwestConfig;
    use crate::testing::StubServer;

    #[test]
    fn accepts_flat_and_nested_lists() -> anyhow::Result<()> {
        assert_eq!(parse_embedding(json!([0.5, 1, -2.0]))?, vec![0.5, 1.0, -2.0]);
        assert_eq!(parse_embedding(json!([[0.25, 0.75]]))?, vec![0.25, 0.75]);
        assert_eq!(parse_embedding(json!([3]))?, vec![3.0]);
        Ok(())
    }

    #[test]
    fn rejects_non_lists() {
        for reply in [json!({ "embedding": [1.0] }), json!("text"), json!(["a", "b"])] {
            let error = parse_embedding(reply).err().map(|e| e.to_string());
            assert_eq!(error.as_deref(), Some(UNEXPECTED_FORMAT));
        }
    }

    #[tokio::test]
    async fn posts_inputs_with_bearer_token() -> anyhow::Result<()> {
        let server = StubServer::start(StatusCode::OK, json!([0.1, 0.2, 0.3])).await?;
        let url = format!("{}/embedding", server.url);
        let client = ReqwestClient::new(ReqwestConfig::default())?;
        let provider = RemoteEmbedding::new(client, url, "key");

        assert_eq!(provider.embedding_dimension().await?, 3);

        let recorded = server.requests();
        assert_eq!(recorded[0].path, "/embedding");
        assert_eq!(recorded[0].authorization.as_deref(), Some("Bearer key"));
        assert_eq!(
            recorded[0].body,
            json!({ "inputs": "This is a dummy sentence." })
        );
        Ok(())
    }

    #[tokio::test]
    async fn unexpected_reply_is_upstream_error() -> anyhow::Result<()> {
        let server = StubServer::start(StatusCode::OK, json!({ "oops": true })).await?;
        let client = ReqwestClient::new(ReqwestConfig::default())?;
        let provider = RemoteEmbedding::new(client, &server.url, "key");

        let error = provider
            .embed_text("text")
            .await
            .err()
            .ok_or_else(|| anyhow::anyhow!("embedding should fail"))?;
        assert_eq!(error.kind, ErrorKind::Upstream);
        assert_eq!(error.message.as_deref(), Some(UNEXPECTED_FORMAT));
        Ok(())
    }
}
