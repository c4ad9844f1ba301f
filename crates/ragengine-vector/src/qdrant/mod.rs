//! Qdrant similarity backend.

mod backend;
mod config;

pub use backend::{QdrantBackend, QdrantIndex};
pub use config::QdrantConfig;
