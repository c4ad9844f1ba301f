//! Error handling for provider operations.
//!
//! Embedding and completion providers report failures through a single
//! structured [`Error`], classified by [`ErrorKind`] so that callers can tell
//! configuration mistakes apart from upstream failures without matching on
//! message strings.

use std::error::Error as StdError;

use strum::{AsRefStr, Display};

/// Type alias for boxed errors that are Send + Sync.
pub type BoxedError = Box<dyn StdError + Send + Sync>;

/// Result type alias for provider operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Main error type for provider operations.
#[derive(Debug, thiserror::Error)]
#[error("{}", .message.as_ref().map(|m| format!("{}: {}", .kind, m)).unwrap_or_else(|| .kind.to_string()))]
pub struct Error {
    /// The specific kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional additional message providing more context.
    pub message: Option<String>,
    /// Optional source error for additional context.
    #[source]
    pub source: Option<BoxedError>,
}

impl Error {
    /// Creates a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            source: None,
        }
    }

    /// Adds a message to this error.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Adds a source error to this error.
    pub fn with_source(mut self, source: impl Into<BoxedError>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration).with_message(message)
    }

    /// Creates an upstream error (network failure, non-2xx response).
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Upstream).with_message(message)
    }

    /// Creates an error for a response body that could not be interpreted.
    pub fn malformed_response(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedResponse).with_message(message)
    }

    /// Creates an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput).with_message(message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal).with_message(message)
    }

    /// Returns true if the failure originated outside this process.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Upstream | ErrorKind::Timeout | ErrorKind::MalformedResponse
        )
    }
}

/// Classification of provider errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// Provider is misconfigured (bad URL, unknown model, missing feature).
    Configuration,
    /// The remote endpoint failed or returned a non-success status.
    Upstream,
    /// The remote endpoint did not answer in time.
    Timeout,
    /// The remote endpoint answered with an unexpected payload.
    MalformedResponse,
    /// The caller supplied input the provider cannot process.
    InvalidInput,
    /// Unexpected failure inside the provider.
    Internal,
}
