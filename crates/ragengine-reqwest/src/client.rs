//! Shared reqwest client.

use std::fmt;
use std::sync::Arc;

use reqwest::Client;
use serde::Serialize;

use crate::TRACING_TARGET;
use crate::config::ReqwestConfig;
use crate::error::{Error, Result};

struct ReqwestClientInner {
    http: Client,
    config: ReqwestConfig,
}

/// HTTP client shared by every network provider.
#[derive(Clone)]
pub struct ReqwestClient {
    inner: Arc<ReqwestClientInner>,
}

impl fmt::Debug for ReqwestClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReqwestClient")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl ReqwestClient {
    /// Creates a client with the given configuration.
    pub fn new(config: ReqwestConfig) -> Result<Self> {
        let timeout = config.effective_timeout();
        let user_agent = config.effective_user_agent();

        tracing::debug!(
            target: TRACING_TARGET,
            timeout_ms = timeout.as_millis(),
            "Creating reqwest client"
        );

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(&user_agent)
            .build()?;

        Ok(Self {
            inner: Arc::new(ReqwestClientInner { http, config }),
        })
    }

    /// Gets the client configuration.
    pub fn config(&self) -> &ReqwestConfig {
        &self.inner.config
    }

    /// POSTs `body` as JSON with a bearer token and decodes the JSON answer.
    ///
    /// Non-success statuses are returned as [`Error::Status`].
    pub(crate) async fn post_json<B>(
        &self,
        url: &str,
        bearer: &str,
        body: &B,
    ) -> Result<serde_json::Value>
    where
        B: Serialize + ?Sized,
    {
        let response = self
            .inner
            .http
            .post(url)
            .bearer_auth(bearer)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body: String = response
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(1024)
                .collect();

            tracing::warn!(
                target: TRACING_TARGET,
                url = %url,
                status = status.as_u16(),
                "Upstream request failed"
            );

            return Err(Error::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
