//! Document indexing handler.

use std::collections::HashMap;

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use ragengine_core::{Document, DocumentId};
use ragengine_vector::VectorStoreManager;

use super::request::IndexRequest;
use super::response::{IndexedDocument, IndexedDocumentList};
use crate::extract::{Json, ValidateJson};
use crate::handler::Result;
use crate::service::ServiceState;

/// Tracing target for indexing operations.
const TRACING_TARGET: &str = "ragengine_server::handler::index";

/// Indexes documents into a namespace, creating it on first use.
///
/// Responds with the documents actually inserted; texts already present in
/// the namespace are skipped.
#[tracing::instrument(skip_all, fields(index_name = %request.index_name))]
async fn index_documents(
    State(manager): State<VectorStoreManager>,
    ValidateJson(request): ValidateJson<IndexRequest>,
) -> Result<(StatusCode, Json<IndexedDocumentList>)> {
    let index_name = request.index_name.clone();
    let documents = request.into_documents();

    tracing::debug!(
        target: TRACING_TARGET,
        requested = documents.len(),
        "Indexing documents"
    );

    let mut by_id: HashMap<DocumentId, Document> = HashMap::with_capacity(documents.len());
    for document in &documents {
        by_id
            .entry(document.doc_id())
            .or_insert_with(|| document.clone());
    }

    let inserted = manager.index(&index_name, documents).await?;
    let response: IndexedDocumentList = inserted
        .into_iter()
        .filter_map(|doc_id| {
            let document = by_id.remove(&doc_id)?;
            Some(IndexedDocument::new(doc_id, document))
        })
        .collect();

    tracing::info!(
        target: TRACING_TARGET,
        inserted = response.len(),
        "Documents indexed"
    );

    Ok((StatusCode::OK, Json(response)))
}

/// Returns a [`Router`] with all related routes.
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/index", post(index_documents))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::handler::test::create_test_server;

    #[tokio::test]
    async fn returns_inserted_documents() -> anyhow::Result<()> {
        let app = create_test_server().await?;

        let response = app
            .server
            .post("/index")
            .json(&json!({
                "index_name": "test_index",
                "documents": [
                    { "text": "First document", "metadata": { "type": "text" } },
                    { "text": "Second document", "metadata": null }
                ]
            }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        let items = body.as_array().map(Vec::as_slice).unwrap_or_default();
        assert_eq!(items.len(), 2);
        assert_eq!(
            items[0]["doc_id"],
            "7ec046034f9610b517150d00b4ad88c5ab944b501a372ed66c1eaff939c32eb1"
        );
        assert_eq!(items[0]["text"], "First document");
        assert_eq!(items[0]["metadata"], json!({ "type": "text" }));
        assert_eq!(items[1]["metadata"], json!({}));
        Ok(())
    }

    #[tokio::test]
    async fn reindexing_is_idempotent() -> anyhow::Result<()> {
        let app = create_test_server().await?;
        let payload = json!({
            "index_name": "test_index",
            "documents": [{ "text": "Same text" }, { "text": "Same text" }]
        });

        let first: Value = app.server.post("/index").json(&payload).await.json();
        assert_eq!(first.as_array().map(Vec::len), Some(1));

        let second = app.server.post("/index").json(&payload).await;
        second.assert_status_ok();
        second.assert_json(&json!([]));
        Ok(())
    }

    #[tokio::test]
    async fn rejects_invalid_requests() -> anyhow::Result<()> {
        let app = create_test_server().await?;

        let unsafe_name = app
            .server
            .post("/index")
            .json(&json!({ "index_name": "../etc", "documents": [{ "text": "A" }] }))
            .await;
        unsafe_name.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = unsafe_name.json();
        assert_eq!(body["name"], "bad_request");

        let empty_text = app
            .server
            .post("/index")
            .json(&json!({ "index_name": "test_index", "documents": [{ "text": "" }] }))
            .await;
        empty_text.assert_status(StatusCode::BAD_REQUEST);

        let malformed = app
            .server
            .post("/index")
            .text("{ not json")
            .content_type("application/json")
            .await;
        malformed.assert_status(StatusCode::BAD_REQUEST);
        Ok(())
    }
}
