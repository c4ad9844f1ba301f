//! Embedding provider abstraction.

use async_trait::async_trait;

use crate::{Error, Result, TRACING_TARGET_EMBEDDING};

/// Text embedded once at startup to discover the dimension of a provider.
pub const DIMENSION_PROBE_TEXT: &str = "This is a dummy sentence.";

/// Turns text into a fixed-dimension vector.
///
/// Implementations must return vectors of the same length for every input;
/// the vector store rejects anything else.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Returns the embedding of a single text.
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>>;

    /// Returns the embeddings of several texts, in input order.
    ///
    /// The default implementation embeds one text at a time.
    async fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed_text(text).await?);
        }
        Ok(embeddings)
    }

    /// Returns the dimension of the vectors this provider produces.
    ///
    /// The default implementation embeds [`DIMENSION_PROBE_TEXT`] and measures
    /// the result.
    async fn embedding_dimension(&self) -> Result<usize> {
        let probe = self.embed_text(DIMENSION_PROBE_TEXT).await?;
        if probe.is_empty() {
            return Err(Error::malformed_response(
                "embedding provider returned an empty vector",
            ));
        }

        tracing::debug!(
            target: TRACING_TARGET_EMBEDDING,
            dimension = probe.len(),
            "Probed embedding dimension"
        );

        Ok(probe.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct LengthEmbedding;

    #[async_trait]
    impl EmbeddingProvider for LengthEmbedding {
        async fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
            Ok(vec![text.len() as f32; 3])
        }
    }

    struct EmptyEmbedding;

    #[async_trait]
    impl EmbeddingProvider for EmptyEmbedding {
        async fn embed_text(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn default_batch_preserves_order() -> Result<()> {
        let texts = vec!["a".to_string(), "abc".to_string()];
        let embeddings = LengthEmbedding.embed_texts(&texts).await?;
        assert_eq!(embeddings, vec![vec![1.0; 3], vec![3.0; 3]]);
        Ok(())
    }

    #[tokio::test]
    async fn dimension_is_probed() -> Result<()> {
        assert_eq!(LengthEmbedding.embedding_dimension().await?, 3);
        Ok(())
    }

    #[tokio::test]
    async fn empty_probe_is_rejected() {
        let error = EmptyEmbedding.embedding_dimension().await.unwrap_err();
        assert_eq!(error.kind, crate::ErrorKind::MalformedResponse);
    }
}
