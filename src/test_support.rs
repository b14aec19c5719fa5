use crate::client::{AgentClient, ClientConfig};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::io;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::dispatcher::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;

pub(crate) const TEST_API_KEY: &str = "test-key";

#[derive(Clone)]
enum Reply {
    Json(Value),
    Text(String),
}

#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) query: Option<String>,
    pub(crate) api_key: Option<String>,
    pub(crate) content_type: Option<String>,
    pub(crate) body: Option<Value>,
}

/// Canned agent service: answers registered routes and records every request.
pub(crate) struct MockService {
    routes: HashMap<(Method, String), (StatusCode, Reply)>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockService {
    pub(crate) fn new() -> Self {
        Self {
            routes: HashMap::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn on(mut self, method: Method, path: &str, status: StatusCode, body: Value) -> Self {
        self.routes
            .insert((method, path.to_string()), (status, Reply::Json(body)));
        self
    }

    pub(crate) fn on_text(mut self, method: Method, path: &str, status: StatusCode, body: &str) -> Self {
        self.routes.insert(
            (method, path.to_string()),
            (status, Reply::Text(body.to_string())),
        );
        self
    }

    pub(crate) async fn start(self) -> (String, Arc<MockService>) {
        let state = Arc::new(self);
        let app = Router::new()
            .fallback(handle)
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}", addr), state)
    }

    pub(crate) async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().await.clone()
    }
}

async fn handle(
    State(state): State<Arc<MockService>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };
    let api_key = header("x-api-key");

    state.requests.lock().await.push(RecordedRequest {
        method: method.clone(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        api_key: api_key.clone(),
        content_type: header("content-type"),
        body: serde_json::from_slice(&body).ok(),
    });

    if api_key.as_deref() != Some(TEST_API_KEY) {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({"detail": "Could not validate API key"})),
        )
            .into_response();
    }

    match state.routes.get(&(method, uri.path().to_string())) {
        Some((status, Reply::Json(body))) => (*status, Json(body.clone())).into_response(),
        Some((status, Reply::Text(body))) => (*status, body.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({"detail": "Not Found"}))).into_response(),
    }
}

/// The create → info → send exchange used by the end-to-end tests.
pub(crate) fn scenario_service() -> MockService {
    MockService::new()
        .on(
            Method::POST,
            "/agent/create",
            StatusCode::OK,
            json!({"agent_id": "abc123", "message": "Agent created successfully"}),
        )
        .on(
            Method::GET,
            "/agent/abc123",
            StatusCode::OK,
            json!({"agent_id": "abc123", "status": "ready"}),
        )
        .on(
            Method::POST,
            "/message/send",
            StatusCode::OK,
            json!({"response": "I can help with X."}),
        )
}

pub(crate) fn test_client(base_url: &str) -> AgentClient {
    AgentClient::new(ClientConfig {
        base_url: base_url.to_string(),
        api_key: TEST_API_KEY.to_string(),
    })
}

/// A base URL whose port had a listener a moment ago and now refuses connections.
pub(crate) fn refused_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// Collects formatted `ERROR` events emitted on the current thread.
#[derive(Clone, Default)]
pub(crate) struct CapturedLogs(Arc<std::sync::Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// Install a thread-local subscriber; events are captured until the guard drops.
    pub(crate) fn install() -> (CapturedLogs, DefaultGuard) {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_max_level(tracing::Level::ERROR)
            .with_ansi(false)
            .without_time()
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);
        (logs, guard)
    }

    pub(crate) fn error_lines(&self) -> Vec<String> {
        let bytes = self.0.lock().unwrap().clone();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .filter(|line| line.contains("ERROR"))
            .map(str::to_string)
            .collect()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
