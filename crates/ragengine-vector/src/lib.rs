#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub mod flat;
#[cfg(feature = "qdrant")]
#[cfg_attr(docsrs, doc(cfg(feature = "qdrant")))]
pub mod qdrant;

mod config;
mod error;
mod index;
mod manager;
mod namespace;
mod persist;
mod prompt;
mod registry;
mod result;
mod store;

pub use config::{BackendConfig, DEFAULT_PERSIST_DIR, StoreConfig};
pub use error::{VectorError, VectorResult};
pub use index::{ScoredNode, SimilarityBackend, SimilarityIndex};
pub use manager::VectorStoreManager;
pub use namespace::{DOCSTORE_FILE, StoredDocument, validate_index_name};
pub use prompt::{node_context, render_prompt};
pub use registry::{REGISTRY_FILE, RegistryEntry};
pub use result::{DocumentInfo, DocumentSummary, IndexedDocuments, QueryResult, SourceNode};
pub use store::{IndexStore, NamespacedStore};

/// Tracing target for vector store operations.
pub const TRACING_TARGET: &str = "ragengine_vector";

/// Tracing target for persistence operations.
pub const TRACING_TARGET_PERSIST: &str = "ragengine_vector::persist";
