//! In-process HTTP stub used by the provider tests.

use std::sync::{Arc, Mutex, PoisonError};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri, header};
use axum::{Json, Router};
use serde_json::Value;
use tokio::net::TcpListener;

/// One request received by the stub.
#[derive(Debug, Clone)]
pub(crate) struct Recorded {
    pub path: String,
    pub authorization: Option<String>,
    pub body: Value,
}

struct Stub {
    status: StatusCode,
    reply: Value,
    requests: Mutex<Vec<Recorded>>,
}

async fn record(
    State(stub): State<Arc<Stub>>,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(ToOwned::to_owned);

    stub.requests
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(Recorded {
            path: uri.path().to_owned(),
            authorization,
            body,
        });

    (stub.status, Json(stub.reply.clone()))
}

/// Answers every POST with a fixed status and JSON body.
pub(crate) struct StubServer {
    pub url: String,
    stub: Arc<Stub>,
}

impl StubServer {
    pub async fn start(status: StatusCode, reply: Value) -> anyhow::Result<Self> {
        let stub = Arc::new(Stub {
            status,
            reply,
            requests: Mutex::new(Vec::new()),
        });

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let url = format!("http://{}", listener.local_addr()?);
        let app = Router::new().fallback(record).with_state(Arc::clone(&stub));
        tokio::spawn(async move { axum::serve(listener, app).await });

        Ok(Self { url, stub })
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.stub
            .requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
