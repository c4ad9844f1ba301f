//! Vector store configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[cfg(feature = "qdrant")]
use crate::qdrant::QdrantConfig;

/// Directory used when none is configured.
pub const DEFAULT_PERSIST_DIR: &str = "storage";

/// Storage configuration of the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Root directory of the registry and namespace payloads.
    pub persist_dir: PathBuf,
    /// Similarity backend shared by every namespace.
    pub backend: BackendConfig,
}

impl StoreConfig {
    /// Creates a configuration for `backend` rooted at `persist_dir`.
    pub fn new(persist_dir: impl Into<PathBuf>, backend: BackendConfig) -> Self {
        Self {
            persist_dir: persist_dir.into(),
            backend,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PERSIST_DIR, BackendConfig::default())
    }
}

/// Similarity backend selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[non_exhaustive]
pub enum BackendConfig {
    /// In-process exhaustive L2 search, persisted next to the docstore.
    #[default]
    Faiss,
    /// Remote Qdrant collections, one per namespace.
    #[cfg(feature = "qdrant")]
    Qdrant(QdrantConfig),
}

impl BackendConfig {
    /// Returns the backend name as written in configuration.
    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Faiss => "faiss",
            #[cfg(feature = "qdrant")]
            Self::Qdrant(_) => "qdrant",
        }
    }
}
