use serde::{Deserialize, Serialize};

/// Qdrant connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QdrantConfig {
    /// gRPC endpoint, e.g. `http://localhost:6334`.
    pub url: String,
    /// API key for authenticated clusters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Prepended to every namespace to form its collection name.
    #[serde(default)]
    pub collection_prefix: String,
}

impl QdrantConfig {
    /// Creates a configuration for `url` without authentication.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: None,
            collection_prefix: String::new(),
        }
    }

    /// Sets the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the collection prefix.
    pub fn with_collection_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.collection_prefix = prefix.into();
        self
    }

    /// Collection name of namespace `index_name`.
    pub fn collection_name(&self, index_name: &str) -> String {
        format!("{}{index_name}", self.collection_prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_name_uses_prefix() {
        let config = QdrantConfig::new("http://localhost:6334").with_collection_prefix("rag_");
        assert_eq!(config.collection_name("docs"), "rag_docs");
    }
}
