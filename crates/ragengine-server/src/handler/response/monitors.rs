//! Health response types.

use serde::{Deserialize, Serialize};

/// Liveness status reported by `GET /health`.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// `"Healthy"` when the service can answer requests.
    pub status: String,
    /// Additional information, omitted when empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl HealthStatus {
    /// Creates a healthy status.
    pub fn healthy() -> Self {
        Self {
            status: "Healthy".to_owned(),
            detail: None,
        }
    }
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self::healthy()
    }
}
