//! Service layer error types.

use thiserror::Error;

/// Result type for service operations.
pub type Result<T, E = ServiceError> = std::result::Result<T, E>;

/// Failures while assembling the service from configuration.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// An option holds a value the service cannot use.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A provider could not be constructed.
    #[error(transparent)]
    Provider(#[from] ragengine_core::Error),

    /// The HTTP client could not be constructed.
    #[error(transparent)]
    Client(#[from] ragengine_reqwest::Error),

    /// The vector store could not be opened.
    #[error(transparent)]
    Vector(#[from] ragengine_vector::VectorError),
}

impl ServiceError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
