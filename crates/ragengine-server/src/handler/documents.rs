//! Document listing, lookup and deletion handlers.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use ragengine_vector::{DocumentInfo, VectorStoreManager};

use super::request::DocumentPathParams;
use super::response::{DeleteDocument, ListDocuments};
use crate::extract::{Json, Path};
use crate::handler::Result;
use crate::service::ServiceState;

/// Tracing target for document operations.
const TRACING_TARGET: &str = "ragengine_server::handler::documents";

/// Lists every resident document grouped by namespace.
#[tracing::instrument(skip_all)]
async fn list_documents(
    State(manager): State<VectorStoreManager>,
) -> Result<(StatusCode, Json<ListDocuments>)> {
    let documents = manager.list_all_indexed_documents().await;

    tracing::debug!(
        target: TRACING_TARGET,
        namespaces = documents.len(),
        "Listed indexed documents"
    );

    Ok((StatusCode::OK, Json(ListDocuments { documents })))
}

#[tracing::instrument(skip_all, fields(index_name = %path.index_name, doc_id = %path.doc_id))]
async fn get_document(
    State(manager): State<VectorStoreManager>,
    Path(path): Path<DocumentPathParams>,
) -> Result<(StatusCode, Json<DocumentInfo>)> {
    let info = manager
        .get_document(&path.index_name, &path.doc_id())
        .await?;

    Ok((StatusCode::OK, Json(info)))
}

#[tracing::instrument(skip_all, fields(index_name = %path.index_name, doc_id = %path.doc_id))]
async fn delete_document(
    State(manager): State<VectorStoreManager>,
    Path(path): Path<DocumentPathParams>,
) -> Result<(StatusCode, Json<DeleteDocument>)> {
    manager
        .delete_document(&path.index_name, &path.doc_id())
        .await?;

    tracing::info!(target: TRACING_TARGET, "Document deleted");

    Ok((StatusCode::OK, Json(DeleteDocument::default())))
}

/// Returns a [`Router`] with all related routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/indexed-documents", get(list_documents))
        .route(
            "/document/{index_name}/{doc_id}",
            get(get_document).delete(delete_document),
        )
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::handler::test::{TestApp, create_test_server};

    const FIRST_ID: &str = "7ec046034f9610b517150d00b4ad88c5ab944b501a372ed66c1eaff939c32eb1";

    async fn seeded() -> anyhow::Result<TestApp> {
        let app = create_test_server().await?;
        app.server
            .post("/index")
            .json(&json!({
                "index_name": "index_a",
                "documents": [{ "text": "First document", "metadata": { "type": "text" } }]
            }))
            .await
            .assert_status_ok();
        app.server
            .post("/index")
            .json(&json!({
                "index_name": "index_b",
                "documents": [{ "text": "First document" }]
            }))
            .await
            .assert_status_ok();
        Ok(app)
    }

    #[tokio::test]
    async fn lists_documents_by_namespace() -> anyhow::Result<()> {
        let app = seeded().await?;

        let response = app.server.get("/indexed-documents").await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["documents"]["index_a"][FIRST_ID]["text"], "First document");
        assert!(body["documents"]["index_a"][FIRST_ID]["hash"].is_string());
        assert_eq!(body["documents"]["index_b"][FIRST_ID]["text"], "First document");
        Ok(())
    }

    #[tokio::test]
    async fn gets_single_document() -> anyhow::Result<()> {
        let app = seeded().await?;

        let found = app.server.get(&format!("/document/index_a/{FIRST_ID}")).await;
        found.assert_status_ok();
        let body: Value = found.json();
        assert_eq!(body["metadata"], json!({ "type": "text" }));
        assert_eq!(body["node_ids"].as_array().map(Vec::len), Some(1));

        app.server
            .get("/document/index_a/unknown")
            .await
            .assert_status(StatusCode::NOT_FOUND);

        let missing_index = app.server.get(&format!("/document/nope/{FIRST_ID}")).await;
        missing_index.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = missing_index.json();
        assert_eq!(body["detail"], "No such index: 'nope' exists.");
        Ok(())
    }

    #[tokio::test]
    async fn deletes_from_one_namespace_only() -> anyhow::Result<()> {
        let app = seeded().await?;
        let persisted = app.manager.persist_count();

        let response = app.server.delete(&format!("/document/index_a/{FIRST_ID}")).await;
        response.assert_status_ok();
        response.assert_json(&json!({ "message": "Document deleted successfully" }));
        assert!(app.manager.persist_count() > persisted);

        app.server
            .get(&format!("/document/index_a/{FIRST_ID}"))
            .await
            .assert_status(StatusCode::NOT_FOUND);
        app.server
            .get(&format!("/document/index_b/{FIRST_ID}"))
            .await
            .assert_status_ok();

        app.server
            .delete(&format!("/document/index_a/{FIRST_ID}"))
            .await
            .assert_status(StatusCode::NOT_FOUND);
        Ok(())
    }
}
