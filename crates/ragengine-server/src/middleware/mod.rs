//! Middleware for `axum::Router` and HTTP request processing.
//!
//! - Observability: request ids, tracing spans, sensitive header redaction
//! - Recovery: request timeouts, panics, middleware errors

mod observability;
mod recovery;

pub use observability::{RouterObservabilityExt, track_request_timing};
pub use recovery::{RecoveryConfig, RouterRecoveryExt};
