//! Global registry of every namespace (`store.json`).

use std::collections::BTreeMap;
use std::path::Path;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::VectorResult;
use crate::persist;

/// File name of the registry under the persist directory.
pub const REGISTRY_FILE: &str = "store.json";

/// Registry record of one namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryEntry {
    /// Identifier assigned when the namespace was created.
    pub index_id: Uuid,
    /// Backend that owns the namespace vectors.
    pub backend: String,
    /// Embedding dimension of the namespace.
    pub dimension: usize,
    /// Creation time.
    pub created_at: Timestamp,
}

impl RegistryEntry {
    /// Creates a record for a namespace created now.
    pub fn new(backend: impl Into<String>, dimension: usize) -> Self {
        Self {
            index_id: Uuid::new_v4(),
            backend: backend.into(),
            dimension,
            created_at: Timestamp::now(),
        }
    }
}

/// Persisted set of namespaces keyed by index name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct IndexRegistry {
    #[serde(default)]
    pub indexes: BTreeMap<String, RegistryEntry>,
}

impl IndexRegistry {
    /// Loads the registry under `persist_dir`, or an empty one if absent.
    pub async fn load(persist_dir: &Path) -> VectorResult<Self> {
        let registry = persist::read_json(&persist_dir.join(REGISTRY_FILE)).await?;
        Ok(registry.unwrap_or_default())
    }

    /// Writes the registry under `persist_dir`.
    pub async fn save(&self, persist_dir: &Path) -> VectorResult<()> {
        persist::write_json(&persist_dir.join(REGISTRY_FILE), self).await
    }
}
