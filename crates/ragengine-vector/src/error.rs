//! Vector store error types.

use std::io;
use std::path::PathBuf;

use ragengine_core::DocumentId;
use thiserror::Error;

/// Result type for vector store operations.
pub type VectorResult<T> = Result<T, VectorError>;

/// Vector store errors.
#[derive(Debug, Error)]
pub enum VectorError {
    /// The namespace was never created.
    #[error("No such index: '{0}' exists.")]
    IndexNotFound(String),

    /// The namespace exists but does not hold the document.
    #[error("Document with ID {doc_id} not found in index '{index_name}'.")]
    DocumentNotFound {
        index_name: String,
        doc_id: DocumentId,
    },

    /// The namespace name cannot be used as a directory name.
    #[error("invalid index name '{name}': {reason}")]
    InvalidIndexName { name: String, reason: &'static str },

    /// A call argument is out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The backend does not implement the operation.
    #[error("{operation} is not supported by the {backend} backend")]
    Unsupported {
        operation: &'static str,
        backend: &'static str,
    },

    /// Vector dimension mismatch.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Embedding or completion provider failure.
    #[error(transparent)]
    Provider(#[from] ragengine_core::Error),

    /// Reading or writing persisted state failed.
    #[error("failed to persist '{}': {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Connection error.
    #[error("connection error: {0}")]
    Connection(String),

    /// Backend-specific error.
    #[error("backend error: {0}")]
    Backend(String),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl VectorError {
    /// Creates an index not found error.
    pub fn index_not_found(name: impl Into<String>) -> Self {
        Self::IndexNotFound(name.into())
    }

    /// Creates a document not found error.
    pub fn document_not_found(index_name: impl Into<String>, doc_id: DocumentId) -> Self {
        Self::DocumentNotFound {
            index_name: index_name.into(),
            doc_id,
        }
    }

    /// Creates an unsupported operation error.
    pub fn unsupported(operation: &'static str, backend: &'static str) -> Self {
        Self::Unsupported { operation, backend }
    }

    /// Creates a dimension mismatch error.
    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }

    /// Creates a persistence error for `path`.
    pub fn persistence(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Persistence {
            path: path.into(),
            source,
        }
    }

    /// Creates a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a backend error.
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    /// Creates an invalid config error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Returns true if the operation was refused for lack of backend support.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported { .. })
    }
}

impl From<serde_json::Error> for VectorError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
