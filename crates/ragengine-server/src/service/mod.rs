//! Application state and dependency injection.

mod config;
mod error;

use std::sync::Arc;

use ragengine_core::EmbeddingProvider;
use ragengine_vector::VectorStoreManager;

pub use crate::service::config::{EmbeddingSource, ServiceConfig, VectorDbImplementation};
pub use crate::service::error::{Result, ServiceError};

/// Tracing target for service initialization.
const TRACING_TARGET: &str = "ragengine_server::service";

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Debug, Clone)]
pub struct ServiceState {
    pub manager: VectorStoreManager,
}

impl ServiceState {
    /// Initializes application state from configuration.
    ///
    /// The embedding provider is chosen by the caller; the inference client
    /// and the vector store are built from `service_config`. Every namespace
    /// listed in the persisted registry is loaded before this returns.
    pub async fn new(
        service_config: &ServiceConfig,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Result<Self> {
        service_config.validate()?;

        let client = service_config.reqwest_client()?;
        let completion = service_config.connect_inference(client)?;
        let store_config = service_config.store_config()?;
        let manager = VectorStoreManager::from_config(&store_config, embedder, completion).await?;

        tracing::info!(
            target: TRACING_TARGET,
            backend = manager.backend_name(),
            persist_dir = %store_config.persist_dir.display(),
            "Service state initialized"
        );

        Ok(Self::from_manager(manager))
    }

    /// Wraps an already opened manager.
    pub fn from_manager(manager: VectorStoreManager) -> Self {
        Self { manager }
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

impl_di!(manager: VectorStoreManager);
