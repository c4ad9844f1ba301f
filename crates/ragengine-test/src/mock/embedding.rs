//! Mock embedding provider for testing.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use ragengine_core::{EmbeddingProvider, Error, Result};

/// Number of buckets produced by [`MockEmbeddingProvider`].
pub const MOCK_EMBEDDING_DIMENSION: usize = 64;

/// Mock embedding provider for testing.
///
/// Produces bag-of-words vectors: every lowercase alphanumeric token adds one
/// to the bucket selected by its FNV-1a hash.
#[derive(Clone, Debug)]
pub struct MockEmbeddingProvider {
    dimension: usize,
    fail_on: Option<String>,
    calls: Arc<AtomicUsize>,
}

impl Default for MockEmbeddingProvider {
    fn default() -> Self {
        Self::new(MOCK_EMBEDDING_DIMENSION)
    }
}

impl MockEmbeddingProvider {
    /// Creates a provider with the given number of buckets.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            fail_on: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Makes every call whose text contains `needle` fail with an upstream error.
    pub fn fail_on(mut self, needle: impl Into<String>) -> Self {
        self.fail_on = Some(needle.into());
        self
    }

    /// Returns how many texts have been embedded so far, across all clones.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Computes the vector for `text` without counting the call.
    pub fn vector(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0; self.dimension];
        let tokens = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|token| !token.is_empty());

        for token in tokens {
            let bucket = fnv1a(&token.to_lowercase()) % self.dimension as u64;
            vector[bucket as usize] += 1.0;
        }

        vector
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(needle) = &self.fail_on
            && text.contains(needle.as_str())
        {
            return Err(Error::upstream(format!(
                "mock embedding refused text containing '{needle}'"
            )));
        }

        Ok(self.vector(text))
    }
}

fn fnv1a(token: &str) -> u64 {
    token.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn vectors_are_deterministic() -> Result<()> {
        let provider = MockEmbeddingProvider::default();
        let first = provider.embed_text("First document").await?;
        let again = provider.embed_text("first DOCUMENT").await?;
        assert_eq!(first, again);
        assert_eq!(first.len(), MOCK_EMBEDDING_DIMENSION);
        assert_eq!(first.iter().sum::<f32>(), 2.0);
        assert_eq!(provider.calls(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn dimension_probe_matches() -> Result<()> {
        let provider = MockEmbeddingProvider::new(8);
        assert_eq!(provider.embedding_dimension().await?, 8);
        Ok(())
    }

    #[tokio::test]
    async fn fails_on_needle() {
        let provider = MockEmbeddingProvider::default().fail_on("boom");
        assert!(provider.embed_text("fine").await.is_ok());
        let error = provider.embed_text("boom goes the dynamite").await.unwrap_err();
        assert!(error.is_upstream());
    }
}
