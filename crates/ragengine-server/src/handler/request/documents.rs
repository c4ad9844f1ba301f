//! Indexing request types.

use ragengine_core::{Document, Metadata};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use super::validations::is_index_name;

/// One document of an indexing request.
#[must_use]
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct DocumentInput {
    /// Content to embed.
    #[validate(length(min = 1))]
    pub text: String,
    /// Optional metadata; `null` is treated as empty.
    #[serde(default, deserialize_with = "nullable")]
    pub metadata: Metadata,
}

impl From<DocumentInput> for Document {
    fn from(input: DocumentInput) -> Self {
        Self {
            text: input.text,
            metadata: input.metadata,
        }
    }
}

/// Request payload for `POST /index`.
#[must_use]
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct IndexRequest {
    /// Target namespace, created on first use.
    #[validate(custom(function = "is_index_name"))]
    pub index_name: String,
    /// Documents to insert, in order.
    #[validate(nested)]
    pub documents: Vec<DocumentInput>,
}

impl IndexRequest {
    /// Converts the payload into engine documents.
    pub fn into_documents(self) -> Vec<Document> {
        self.documents.into_iter().map(Document::from).collect()
    }
}

fn nullable<'de, D>(deserializer: D) -> Result<Metadata, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Metadata>::deserialize(deserializer)?.unwrap_or_default())
}
