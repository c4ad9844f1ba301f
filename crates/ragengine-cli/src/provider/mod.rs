//! Embedding provider construction.

#[cfg(feature = "fastembed")]
mod local;

use std::sync::Arc;

use anyhow::Context;
use ragengine_core::EmbeddingProvider;
use ragengine_server::service::{EmbeddingSource, ServiceConfig};

use crate::TRACING_TARGET_CONFIG;

/// Creates the embedding provider selected by `EMBEDDING_SOURCE_TYPE`.
pub fn create_embedding(config: &ServiceConfig) -> anyhow::Result<Arc<dyn EmbeddingProvider>> {
    let source = config.embedding_source()?;

    tracing::info!(
        target: TRACING_TARGET_CONFIG,
        source = %source,
        "Creating embedding provider"
    );

    match source {
        EmbeddingSource::Remote => {
            let client = config
                .reqwest_client()
                .context("failed to create HTTP client")?;
            Ok(Arc::new(config.connect_remote_embedding(client)))
        }
        EmbeddingSource::Local => create_local(config),
    }
}

#[cfg(feature = "fastembed")]
fn create_local(config: &ServiceConfig) -> anyhow::Result<Arc<dyn EmbeddingProvider>> {
    let model = local::LocalEmbedding::new(&config.local_embedding_model_id)?;
    Ok(Arc::new(model))
}

#[cfg(not(feature = "fastembed"))]
fn create_local(config: &ServiceConfig) -> anyhow::Result<Arc<dyn EmbeddingProvider>> {
    Err(ragengine_core::Error::configuration(format!(
        "local embedding model '{}' requires building with the `fastembed` feature",
        config.local_embedding_model_id
    ))
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_source_builds_provider() -> anyhow::Result<()> {
        let config = ServiceConfig {
            embedding_source_type: "Remote".into(),
            ..ServiceConfig::default()
        };
        create_embedding(&config)?;
        Ok(())
    }

    #[cfg(not(feature = "fastembed"))]
    #[test]
    fn local_source_names_missing_feature() {
        let config = ServiceConfig::default();
        let Err(error) = create_embedding(&config) else {
            panic!("local embedding should be unavailable");
        };
        assert!(error.to_string().contains("fastembed"));
    }

    #[test]
    fn unknown_source_is_rejected() {
        let config = ServiceConfig {
            embedding_source_type: "cloud".into(),
            ..ServiceConfig::default()
        };
        assert!(create_embedding(&config).is_err());
    }
}
