//! Indexable documents and their content-derived identifiers.

use std::collections::BTreeMap;

use derive_more::{Display, Into};
use serde::{Deserialize, Deserializer, Serialize};
use sha2::{Digest, Sha256};

/// Free-form document metadata.
///
/// Insertion order is not significant anywhere in the engine; everything that
/// renders or hashes metadata orders it by key first.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Content-derived document identifier: the sha256 hex digest of the text.
///
/// Two documents with identical text always share an identifier regardless of
/// their metadata, which makes this the deduplication key of every namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, Into)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Derives the identifier of `text`.
    pub fn from_text(text: &str) -> Self {
        Self(hex::encode(Sha256::digest(text.as_bytes())))
    }

    /// Wraps an identifier received from a caller (for example a path segment).
    ///
    /// No validation happens here; an unknown identifier simply never matches.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the hex digest.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The unit of indexable content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Content to embed and retrieve.
    pub text: String,
    /// Optional metadata; `null` and absent both mean empty.
    #[serde(default, deserialize_with = "nullable_metadata")]
    pub metadata: Metadata,
}

impl Document {
    /// Creates a document without metadata.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            metadata: Metadata::new(),
        }
    }

    /// Adds a metadata entry.
    pub fn with_metadata(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Returns the content-derived identifier of this document.
    pub fn doc_id(&self) -> DocumentId {
        DocumentId::from_text(&self.text)
    }

    /// Returns a digest over both text and metadata.
    ///
    /// Unlike [`Document::doc_id`], this changes when only the metadata does.
    pub fn content_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.text.as_bytes());
        let sorted: BTreeMap<&String, &serde_json::Value> = self.metadata.iter().collect();
        if let Ok(encoded) = serde_json::to_vec(&sorted) {
            hasher.update(&encoded);
        }
        hex::encode(hasher.finalize())
    }
}

impl AsRef<str> for DocumentId {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn nullable_metadata<'de, D>(deserializer: D) -> Result<Metadata, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Metadata>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn doc_id_is_sha256_of_text() {
        let doc = Document::new("First document");
        assert_eq!(
            doc.doc_id().as_str(),
            "7ec046034f9610b517150d00b4ad88c5ab944b501a372ed66c1eaff939c32eb1"
        );
        assert_eq!(
            DocumentId::from_text("X").as_str(),
            "4b68ab3847feda7d6c62c1fbcbeebfa35eab7351ed5e78f4ddadea5df64b8015"
        );
    }

    #[test]
    fn doc_id_ignores_metadata() {
        let plain = Document::new("A");
        let tagged = Document::new("A").with_metadata("type", "text");
        assert_eq!(plain.doc_id(), tagged.doc_id());
        assert_ne!(plain.content_hash(), tagged.content_hash());
    }

    #[test]
    fn content_hash_is_stable() {
        let first = Document::new("A").with_metadata("b", 2).with_metadata("a", 1);
        let second = Document::new("A").with_metadata("a", 1).with_metadata("b", 2);
        assert_eq!(first.content_hash(), second.content_hash());
    }

    #[test]
    fn metadata_defaults_to_empty() -> serde_json::Result<()> {
        let absent: Document = serde_json::from_value(json!({ "text": "A" }))?;
        assert!(absent.metadata.is_empty());

        let null: Document = serde_json::from_value(json!({ "text": "A", "metadata": null }))?;
        assert!(null.metadata.is_empty());

        let present: Document =
            serde_json::from_value(json!({ "text": "A", "metadata": { "type": "text" } }))?;
        assert_eq!(present.metadata.get("type"), Some(&json!("text")));
        Ok(())
    }

    #[test]
    fn document_id_serializes_transparently() -> serde_json::Result<()> {
        let id = DocumentId::from_text("A");
        let encoded = serde_json::to_string(&id)?;
        assert_eq!(encoded, format!("\"{}\"", id));
        Ok(())
    }
}
