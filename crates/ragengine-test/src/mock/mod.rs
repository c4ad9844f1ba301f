//! Mock provider implementations.

mod completion;
mod embedding;

pub use completion::MockCompletionProvider;
pub use embedding::{MOCK_EMBEDDING_DIMENSION, MockEmbeddingProvider};
