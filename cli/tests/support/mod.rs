//! In-process JSON-RPC mock server.
//!
//! The server runs on its own tokio runtime thread so the blocking client under
//! test can be driven from a plain `#[test]`.

#![allow(dead_code)]

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{any, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;

#[derive(Clone)]
pub enum Behavior {
    /// Reply 200 with this JSON body.
    Json(Value),
    /// Reply 200 with `{"jsonrpc":"2.0","id":<id>,"result":"<method>"}`.
    EchoMethod,
    /// Reply with this status and plain-text body.
    Status(u16, &'static str),
    /// Reply 200 with a body that is not JSON.
    Raw(&'static str),
    /// Sleep before replying 200 with this JSON body.
    Delay(Duration, Value),
    /// Reply with this 3xx status pointing at `/moved`, body "moved".
    Redirect(u16),
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub content_type: Option<String>,
    pub body: String,
}

impl RecordedRequest {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("request body should be JSON")
    }
}

struct MockState {
    behavior: Behavior,
    requests: Mutex<Vec<RecordedRequest>>,
}

pub struct MockServer {
    addr: SocketAddr,
    state: Arc<MockState>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl MockServer {
    pub fn start(behavior: Behavior) -> Self {
        let state = Arc::new(MockState {
            behavior,
            requests: Mutex::new(Vec::new()),
        });
        let (addr_tx, addr_rx) = mpsc::channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let app_state = state.clone();

        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .worker_threads(2)
                .enable_all()
                .build()
                .expect("mock runtime");

            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind mock server");
                addr_tx
                    .send(listener.local_addr().expect("mock address"))
                    .expect("report mock address");

                let app = Router::new()
                    .route("/", post(handle))
                    .route("/moved", any(handle))
                    .with_state(app_state);
                axum::serve(listener, app)
                    .with_graceful_shutdown(async {
                        let _ = shutdown_rx.await;
                    })
                    .await
                    .expect("mock server");
            });
        });

        let addr = addr_rx.recv().expect("mock server address");
        Self {
            addr,
            state,
            shutdown: Some(shutdown_tx),
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().expect("requests lock").clone()
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

async fn handle(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let recorded = RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        content_type: headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string),
        body: String::from_utf8_lossy(&body).into_owned(),
    };
    let request: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    state.requests.lock().expect("requests lock").push(recorded);

    match &state.behavior {
        Behavior::Json(value) => Json(value.clone()).into_response(),
        Behavior::EchoMethod => Json(json!({
            "jsonrpc": "2.0",
            "id": request["id"],
            "result": request["method"],
        }))
        .into_response(),
        Behavior::Status(code, text) => {
            let status = StatusCode::from_u16(*code).expect("valid status");
            (status, text.to_string()).into_response()
        }
        Behavior::Raw(text) => (StatusCode::OK, text.to_string()).into_response(),
        Behavior::Delay(delay, value) => {
            tokio::time::sleep(*delay).await;
            Json(value.clone()).into_response()
        }
        Behavior::Redirect(code) => {
            let status = StatusCode::from_u16(*code).expect("valid status");
            (status, [(header::LOCATION, "/moved")], "moved").into_response()
        }
    }
}

/// An address that refuses connections.
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("reserve port");
    let addr = listener.local_addr().expect("reserved address");
    drop(listener);
    format!("http://{}/", addr)
}
