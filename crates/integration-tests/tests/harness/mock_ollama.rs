//! Mock Ollama backend for integration tests
//!
//! Implements `POST /api/generate` (non-streaming) and records every
//! request body it receives

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use tokio_util::sync::CancellationToken;

/// Mock Ollama server that returns a canned completion
pub struct MockOllama {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockOllamaState>,
}

struct MockOllamaState {
    request_count: AtomicU32,
    requests: Mutex<Vec<serde_json::Value>>,
    reply: Reply,
}

enum Reply {
    Completion(String),
    Error(StatusCode, String),
}

impl MockOllama {
    /// Start a mock that answers every request with `completion`
    pub async fn start_with_completion(completion: &str) -> anyhow::Result<Self> {
        Self::start_inner(Reply::Completion(completion.to_owned())).await
    }

    /// Start a mock that fails every request the way Ollama does
    pub async fn start_failing(status: u16, message: &str) -> anyhow::Result<Self> {
        Self::start_inner(Reply::Error(StatusCode::from_u16(status)?, message.to_owned())).await
    }

    async fn start_inner(reply: Reply) -> anyhow::Result<Self> {
        let state = Arc::new(MockOllamaState {
            request_count: AtomicU32::new(0),
            requests: Mutex::new(Vec::new()),
            reply,
        });

        let app = Router::new()
            .route("/api/generate", routing::post(handle_generate))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL for configuring the mock as the extraction backend
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of generate requests received
    pub fn request_count(&self) -> u32 {
        self.state.request_count.load(Ordering::Relaxed)
    }

    /// Most recent request body
    pub fn last_request(&self) -> Option<serde_json::Value> {
        self.state.requests.lock().unwrap().last().cloned()
    }
}

impl Drop for MockOllama {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle_generate(State(state): State<Arc<MockOllamaState>>, Json(body): Json<serde_json::Value>) -> Response {
    state.request_count.fetch_add(1, Ordering::Relaxed);

    let model = body["model"].as_str().unwrap_or_default().to_owned();
    state.requests.lock().unwrap().push(body);

    match &state.reply {
        Reply::Completion(completion) => Json(serde_json::json!({
            "model": model,
            "created_at": "2024-01-01T00:00:00Z",
            "response": completion,
            "done": true,
        }))
        .into_response(),
        Reply::Error(status, message) => (*status, Json(serde_json::json!({ "error": message }))).into_response(),
    }
}
