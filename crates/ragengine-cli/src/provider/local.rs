//! In-process embeddings via fastembed.

use std::sync::Arc;

use async_trait::async_trait;
use fastembed::{InitOptions, TextEmbedding};
use ragengine_core::{EmbeddingProvider, Error, Result};

use crate::TRACING_TARGET_CONFIG;

/// Local embedding model.
///
/// Inference is blocking, so every call runs on the blocking thread pool.
pub struct LocalEmbedding {
    model: Arc<TextEmbedding>,
    model_id: String,
}

impl LocalEmbedding {
    /// Loads `model_id`, downloading it on first use.
    ///
    /// The id is matched against fastembed's model codes, first exactly and
    /// then by the name after the organisation prefix, ignoring case.
    pub fn new(model_id: &str) -> Result<Self> {
        let model = resolve_model(model_id)?;
        let options = InitOptions::new(model).with_show_download_progress(false);
        let embedding = TextEmbedding::try_new(options).map_err(|e| {
            Error::configuration(format!("failed to load embedding model '{model_id}': {e}"))
        })?;

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            model_id = %model_id,
            "Local embedding model loaded"
        );

        Ok(Self {
            model: Arc::new(embedding),
            model_id: model_id.to_owned(),
        })
    }

    async fn embed_blocking(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        let model = self.model.clone();
        tokio::task::spawn_blocking(move || model.embed(texts, None))
            .await
            .map_err(|e| Error::internal(format!("embedding task failed: {e}")))?
            .map_err(|e| Error::internal(format!("embedding failed: {e}")))
    }
}

#[async_trait]
impl EmbeddingProvider for LocalEmbedding {
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_blocking(vec![text.to_owned()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::internal("embedding model returned no vector"))
    }

    async fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.embed_blocking(texts.to_vec()).await
    }
}

impl std::fmt::Debug for LocalEmbedding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalEmbedding")
            .field("model_id", &self.model_id)
            .finish()
    }
}

fn resolve_model(model_id: &str) -> Result<fastembed::EmbeddingModel> {
    let supported = TextEmbedding::list_supported_models();
    let short_name = |code: &str| code.rsplit('/').next().unwrap_or(code).to_ascii_lowercase();
    let wanted = short_name(model_id);

    supported
        .iter()
        .find(|info| info.model_code.eq_ignore_ascii_case(model_id))
        .or_else(|| {
            supported
                .iter()
                .find(|info| short_name(&info.model_code) == wanted)
        })
        .map(|info| info.model.clone())
        .ok_or_else(|| {
            Error::configuration(format!("unsupported local embedding model '{model_id}'"))
        })
}
