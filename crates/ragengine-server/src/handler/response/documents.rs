//! Document response types.

use ragengine_core::{Document, DocumentId, Metadata};
use ragengine_vector::IndexedDocuments;
use serde::{Deserialize, Serialize};

/// A document accepted by `POST /index`.
#[must_use]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedDocument {
    /// Content-derived identifier.
    pub doc_id: DocumentId,
    /// Stored text.
    pub text: String,
    /// Stored metadata.
    pub metadata: Metadata,
}

impl IndexedDocument {
    /// Pairs a document with its identifier.
    pub fn new(doc_id: DocumentId, document: Document) -> Self {
        Self {
            doc_id,
            text: document.text,
            metadata: document.metadata,
        }
    }
}

/// Response for `POST /index`.
pub type IndexedDocumentList = Vec<IndexedDocument>;

/// Response for `GET /indexed-documents`.
#[must_use]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListDocuments {
    /// Documents grouped by namespace, then by identifier.
    pub documents: IndexedDocuments,
}

/// Response for `DELETE /document/{index_name}/{doc_id}`.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteDocument {
    pub message: String,
}

impl Default for DeleteDocument {
    fn default() -> Self {
        Self {
            message: "Document deleted successfully".to_owned(),
        }
    }
}
