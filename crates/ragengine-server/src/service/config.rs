use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use ragengine_core::CompletionProvider;
use ragengine_reqwest::{InferenceClient, RemoteEmbedding, ReqwestClient, ReqwestConfig};
use ragengine_vector::{BackendConfig, StoreConfig};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::service::{Result, ServiceError};

/// Default values for configuration options.
mod defaults {
    pub const EMBEDDING_SOURCE_TYPE: &str = "local";
    pub const LOCAL_EMBEDDING_MODEL_ID: &str = "BAAI/bge-small-en-v1.5";
    pub const REMOTE_EMBEDDING_URL: &str = "http://localhost:5000/embedding";
    pub const ACCESS_SECRET: &str = "default-access-secret";
    pub const LLM_INFERENCE_URL: &str = "http://localhost:5000/chat";
    pub const VECTOR_DB_IMPLEMENTATION: &str = "faiss";
    pub const VECTOR_DB_PERSIST_DIR: &str = ragengine_vector::DEFAULT_PERSIST_DIR;
    pub const UPSTREAM_TIMEOUT_SECS: u64 = 60;
}

/// Where document and query embeddings are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EmbeddingSource {
    /// In-process model.
    Local,
    /// HTTP embedding endpoint.
    Remote,
}

/// Similarity backend shared by every namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum VectorDbImplementation {
    /// In-process flat L2 index.
    Faiss,
    /// Remote Qdrant collections.
    Qdrant,
}

/// App [`state`] configuration.
///
/// [`state`]: crate::service::ServiceState
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct ServiceConfig {
    /// Embedding source: `local` or `remote` (case-insensitive).
    #[cfg_attr(
        feature = "config",
        arg(long, env = "EMBEDDING_SOURCE_TYPE", default_value = defaults::EMBEDDING_SOURCE_TYPE)
    )]
    pub embedding_source_type: String,

    /// Model identifier loaded by the local embedding source.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "LOCAL_EMBEDDING_MODEL_ID", default_value = defaults::LOCAL_EMBEDDING_MODEL_ID)
    )]
    pub local_embedding_model_id: String,

    /// Endpoint of the remote embedding source.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "REMOTE_EMBEDDING_URL", default_value = defaults::REMOTE_EMBEDDING_URL)
    )]
    pub remote_embedding_url: String,

    /// Bearer token sent to the remote embedding source.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "REMOTE_EMBEDDING_ACCESS_SECRET", default_value = defaults::ACCESS_SECRET, hide_env_values = true)
    )]
    #[serde(skip_serializing)]
    pub remote_embedding_access_secret: String,

    /// Endpoint of the inference backend.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "LLM_INFERENCE_URL", default_value = defaults::LLM_INFERENCE_URL)
    )]
    pub llm_inference_url: String,

    /// Bearer token sent to the inference backend.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "LLM_ACCESS_SECRET", default_value = defaults::ACCESS_SECRET, hide_env_values = true)
    )]
    #[serde(skip_serializing)]
    pub llm_access_secret: String,

    /// Similarity backend: `faiss` or `qdrant`.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "VECTOR_DB_IMPLEMENTATION", default_value = defaults::VECTOR_DB_IMPLEMENTATION)
    )]
    pub vector_db_implementation: String,

    /// Root directory of persisted namespaces.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "VECTOR_DB_PERSIST_DIR", default_value = defaults::VECTOR_DB_PERSIST_DIR)
    )]
    pub vector_db_persist_dir: PathBuf,

    /// Qdrant endpoint, required by the `qdrant` backend.
    #[cfg_attr(feature = "config", arg(long, env = "QDRANT_URL"))]
    pub qdrant_url: Option<String>,

    /// Qdrant API key.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "QDRANT_API_KEY", hide_env_values = true)
    )]
    #[serde(skip_serializing)]
    pub qdrant_api_key: Option<String>,

    /// Timeout in seconds for every embedding and inference call.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "UPSTREAM_TIMEOUT", default_value_t = defaults::UPSTREAM_TIMEOUT_SECS)
    )]
    pub upstream_timeout: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            embedding_source_type: defaults::EMBEDDING_SOURCE_TYPE.to_owned(),
            local_embedding_model_id: defaults::LOCAL_EMBEDDING_MODEL_ID.to_owned(),
            remote_embedding_url: defaults::REMOTE_EMBEDDING_URL.to_owned(),
            remote_embedding_access_secret: defaults::ACCESS_SECRET.to_owned(),
            llm_inference_url: defaults::LLM_INFERENCE_URL.to_owned(),
            llm_access_secret: defaults::ACCESS_SECRET.to_owned(),
            vector_db_implementation: defaults::VECTOR_DB_IMPLEMENTATION.to_owned(),
            vector_db_persist_dir: PathBuf::from(defaults::VECTOR_DB_PERSIST_DIR),
            qdrant_url: None,
            qdrant_api_key: None,
            upstream_timeout: defaults::UPSTREAM_TIMEOUT_SECS,
        }
    }
}

impl ServiceConfig {
    /// Validates every option without contacting any endpoint.
    pub fn validate(&self) -> Result<()> {
        let source = self.embedding_source()?;
        self.store_config()?;

        if self.llm_inference_url.trim().is_empty() {
            return Err(ServiceError::config("LLM_INFERENCE_URL cannot be empty"));
        }

        if source == EmbeddingSource::Remote && self.remote_embedding_url.trim().is_empty()
        {
            return Err(ServiceError::config(
                "REMOTE_EMBEDDING_URL cannot be empty when EMBEDDING_SOURCE_TYPE is remote",
            ));
        }

        if self.upstream_timeout == 0 {
            return Err(ServiceError::config("UPSTREAM_TIMEOUT must be positive"));
        }

        Ok(())
    }

    /// Parses `EMBEDDING_SOURCE_TYPE`.
    pub fn embedding_source(&self) -> Result<EmbeddingSource> {
        self.embedding_source_type.parse().map_err(|_| {
            ServiceError::config(format!(
                "Unsupported embedding type '{}', expected 'local' or 'remote'",
                self.embedding_source_type
            ))
        })
    }

    /// Parses `VECTOR_DB_IMPLEMENTATION`.
    pub fn vector_db(&self) -> Result<VectorDbImplementation> {
        self.vector_db_implementation.parse().map_err(|_| {
            ServiceError::config(format!(
                "Unsupported vector store '{}', expected 'faiss' or 'qdrant'",
                self.vector_db_implementation
            ))
        })
    }

    /// Returns the timeout applied to upstream calls.
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout)
    }

    /// Builds the storage configuration.
    pub fn store_config(&self) -> Result<StoreConfig> {
        let backend = match self.vector_db()? {
            VectorDbImplementation::Faiss => BackendConfig::Faiss,
            VectorDbImplementation::Qdrant => self.qdrant_backend()?,
        };

        Ok(StoreConfig::new(self.vector_db_persist_dir.clone(), backend))
    }

    #[cfg(feature = "qdrant")]
    fn qdrant_backend(&self) -> Result<BackendConfig> {
        use ragengine_vector::qdrant::QdrantConfig;

        let url = self
            .qdrant_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| ServiceError::config("QDRANT_URL is required by the qdrant backend"))?;

        let mut config = QdrantConfig::new(url);
        if let Some(api_key) = &self.qdrant_api_key {
            config = config.with_api_key(api_key.as_str());
        }

        Ok(BackendConfig::Qdrant(config))
    }

    #[cfg(not(feature = "qdrant"))]
    fn qdrant_backend(&self) -> Result<BackendConfig> {
        Err(ServiceError::config(
            "the qdrant backend requires building with the `qdrant` feature",
        ))
    }

    /// Creates the HTTP client shared by the network providers.
    pub fn reqwest_client(&self) -> Result<ReqwestClient> {
        let config = ReqwestConfig::default().with_timeout(self.upstream_timeout());
        Ok(ReqwestClient::new(config)?)
    }

    /// Creates the remote embedding provider.
    pub fn connect_remote_embedding(&self, client: ReqwestClient) -> RemoteEmbedding {
        RemoteEmbedding::new(
            client,
            self.remote_embedding_url.as_str(),
            self.remote_embedding_access_secret.as_str(),
        )
    }

    /// Creates the inference client.
    pub fn connect_inference(&self, client: ReqwestClient) -> Result<Arc<dyn CompletionProvider>> {
        let inference = InferenceClient::new(
            client,
            &self.llm_inference_url,
            self.llm_access_secret.as_str(),
        )?;

        Ok(Arc::new(inference))
    }
}
