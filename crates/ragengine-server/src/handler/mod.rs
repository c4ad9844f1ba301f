//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler

mod documents;
mod error;
mod index;
mod monitors;
mod query;
pub mod request;
pub mod response;

use axum::Router;
use axum::response::{IntoResponse, Response};

pub use crate::handler::error::{Error, ErrorKind, Result};
use crate::service::ServiceState;

/// Tracing target for request validation failures.
pub(crate) const TRACING_TARGET_VALIDATION: &str = "ragengine_server::handler::validation";

#[inline]
async fn handler() -> Response {
    ErrorKind::NotFound.into_response()
}

/// Returns a [`Router`] with every route and a `404` fallback.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .merge(monitors::routes())
        .merge(index::routes())
        .merge(query::routes())
        .merge(documents::routes())
        .fallback(handler)
}

#[cfg(test)]
pub(crate) mod test {
    use std::sync::Arc;

    use axum_test::TestServer;
    use ragengine_test::{MockCompletionProvider, MockEmbeddingProvider};
    use ragengine_vector::{BackendConfig, StoreConfig, VectorStoreManager};
    use tempfile::TempDir;

    use crate::handler::routes;
    use crate::service::ServiceState;

    /// Test server over a fresh storage directory and mock providers.
    pub struct TestApp {
        pub server: TestServer,
        pub completion: MockCompletionProvider,
        pub manager: VectorStoreManager,
        _storage: TempDir,
    }

    /// Returns a new [`TestApp`] with the default router.
    pub async fn create_test_server() -> anyhow::Result<TestApp> {
        let storage = tempfile::tempdir()?;
        let completion = MockCompletionProvider::default();
        let manager = VectorStoreManager::from_config(
            &StoreConfig::new(storage.path(), BackendConfig::Faiss),
            Arc::new(MockEmbeddingProvider::default()),
            Arc::new(completion.clone()),
        )
        .await?;

        let state = ServiceState::from_manager(manager.clone());
        let server = TestServer::new(routes().with_state(state))?;

        Ok(TestApp {
            server,
            completion,
            manager,
            _storage: storage,
        })
    }

    #[tokio::test]
    async fn handlers() -> anyhow::Result<()> {
        let app = create_test_server().await?;
        assert!(app.server.is_running());
        Ok(())
    }

    #[tokio::test]
    async fn unknown_routes_are_not_found() -> anyhow::Result<()> {
        let app = create_test_server().await?;

        let response = app.server.get("/nowhere").await;
        response.assert_status_not_found();
        let body: serde_json::Value = response.json();
        assert_eq!(body["name"], "not_found");
        assert!(body["detail"].is_string());
        Ok(())
    }
}
