//! Path parameter types for HTTP handlers.

use ragengine_core::DocumentId;
use serde::{Deserialize, Serialize};

/// Path parameters for single-document operations.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentPathParams {
    /// Namespace holding the document.
    pub index_name: String,
    /// Content-derived identifier of the document.
    pub doc_id: String,
}

impl DocumentPathParams {
    /// Returns the document identifier.
    pub fn doc_id(&self) -> DocumentId {
        DocumentId::from_raw(self.doc_id.as_str())
    }
}
