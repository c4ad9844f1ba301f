//! Retrieval-augmented query handler.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use ragengine_vector::VectorStoreManager;

use super::request::QueryRequest;
use super::response::QueryResponse;
use crate::extract::{Json, ValidateJson};
use crate::handler::Result;
use crate::service::ServiceState;

/// Tracing target for query operations.
const TRACING_TARGET: &str = "ragengine_server::handler::query";

/// Retrieves the closest documents and answers the query over them.
#[tracing::instrument(skip_all, fields(index_name = %request.index_name, top_k = request.top_k))]
async fn query_index(
    State(manager): State<VectorStoreManager>,
    ValidateJson(mut request): ValidateJson<QueryRequest>,
) -> Result<(StatusCode, Json<QueryResponse>)> {
    let llm_params = request.llm_params();

    tracing::debug!(
        target: TRACING_TARGET,
        params = llm_params.len(),
        "Query received"
    );

    let result = manager
        .query(&request.index_name, &request.query, request.top_k, llm_params)
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        source_nodes = result.source_nodes.len(),
        "Query answered"
    );

    Ok((StatusCode::OK, Json(result.into())))
}

/// Returns a [`Router`] with all related routes.
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/query", post(query_index))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::handler::test::create_test_server;

    #[tokio::test]
    async fn end_to_end_query() -> anyhow::Result<()> {
        let app = create_test_server().await?;
        app.server
            .post("/index")
            .json(&json!({
                "index_name": "test_index",
                "documents": [
                    { "text": "First document", "metadata": { "type": "text" } },
                    { "text": "Second document" }
                ]
            }))
            .await
            .assert_status_ok();

        let response = app
            .server
            .post("/query")
            .json(&json!({
                "index_name": "test_index",
                "query": "First",
                "top_k": 1,
                "llm_params": { "temperature": 0.7 },
                "rerank_params": { "top_n": 1 }
            }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["response"], "This is a mock completion");

        let nodes = body["source_nodes"].as_array().map(Vec::as_slice).unwrap_or_default();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0]["text"], "First document");

        let node_id = nodes[0]["node_id"].as_str().unwrap_or_default();
        assert_eq!(body["metadata"][node_id], json!({ "type": "text" }));

        let requests = app.completion.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].params.get("temperature"), Some(&json!(0.7)));
        assert!(requests[0].prompt.contains("type: text\n\nFirst document"));
        Ok(())
    }

    #[tokio::test]
    async fn unknown_index_is_internal_error() -> anyhow::Result<()> {
        let app = create_test_server().await?;

        let response = app
            .server
            .post("/query")
            .json(&json!({ "index_name": "missing", "query": "anything" }))
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = response.json();
        assert_eq!(body["detail"], "No such index: 'missing' exists.");
        assert!(app.completion.requests().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn zero_top_k_is_bad_request() -> anyhow::Result<()> {
        let app = create_test_server().await?;

        let response = app
            .server
            .post("/query")
            .json(&json!({ "index_name": "test_index", "query": "First", "top_k": 0 }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        Ok(())
    }
}
