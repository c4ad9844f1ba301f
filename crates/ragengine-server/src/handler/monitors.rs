//! Liveness handler.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use ragengine_vector::VectorStoreManager;

use super::response::HealthStatus;
use crate::extract::Json;
use crate::handler::Result;
use crate::service::ServiceState;

/// Tracing target for monitor operations.
const TRACING_TARGET: &str = "ragengine_server::handler::monitors";

#[tracing::instrument(skip_all)]
async fn health_status(
    State(manager): State<VectorStoreManager>,
) -> Result<(StatusCode, Json<HealthStatus>)> {
    tracing::debug!(
        target: TRACING_TARGET,
        backend = manager.backend_name(),
        persist_count = manager.persist_count(),
        "Health status check requested"
    );

    Ok((StatusCode::OK, Json(HealthStatus::healthy())))
}

/// Returns a [`Router`] with all related routes.
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/health", get(health_status))
}
