#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for embedding operations.
pub const TRACING_TARGET_EMBEDDING: &str = "ragengine_core::embedding";

/// Tracing target for completion operations.
pub const TRACING_TARGET_COMPLETION: &str = "ragengine_core::completion";

mod completion;
mod document;
mod embedding;
mod error;

pub use completion::{CompletionProvider, CompletionRequest, CompletionResponse, LlmParams};
pub use document::{Document, DocumentId, Metadata};
pub use embedding::{DIMENSION_PROBE_TEXT, EmbeddingProvider};
pub use error::{BoxedError, Error, ErrorKind, Result};
