#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod client;
mod config;
mod embedding;
mod error;
mod inference;
#[cfg(test)]
mod testing;

pub use crate::client::ReqwestClient;
pub use crate::config::{DEFAULT_TIMEOUT, ReqwestConfig};
pub use crate::embedding::RemoteEmbedding;
pub use crate::error::{Error, Result};
pub use crate::inference::{
    DEFAULT_OPENAI_MODEL, HUGGINGFACE_URL_PREFIX, InferenceBackend, InferenceClient,
    OPENAI_URL_PREFIX,
};

/// Tracing target for HTTP client operations.
pub const TRACING_TARGET: &str = "ragengine_reqwest::client";

/// Tracing target for inference requests.
pub const TRACING_TARGET_INFERENCE: &str = "ragengine_reqwest::inference";

/// Tracing target for embedding requests.
pub const TRACING_TARGET_EMBEDDING: &str = "ragengine_reqwest::embedding";
