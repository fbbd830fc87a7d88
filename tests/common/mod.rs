//! In-process mock of the analysis service, served with axum.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use serde_json::{Value, json};

/// Scripted backend state. Each `GET /results/{id}` pops the next response;
/// the last one repeats once the script runs out.
pub struct MockState {
    script: Mutex<VecDeque<(StatusCode, Value)>>,
    last: Mutex<Option<(StatusCode, Value)>>,
    pub create_status: StatusCode,
    pub requests: Mutex<Vec<Value>>,
    pub fetches: AtomicUsize,
    pub fetched_ids: Mutex<Vec<String>>,
}

impl MockState {
    pub fn creates(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

async fn analyze(
    State(state): State<Arc<MockState>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.requests.lock().unwrap().push(body.clone());
    if !state.create_status.is_success() {
        return (state.create_status, Json(json!({"detail": "boom"})));
    }
    let url = body["repo_url"].as_str().unwrap_or_default();
    let repo_id = url
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .trim_end_matches(".git")
        .to_string();
    (
        StatusCode::OK,
        Json(json!({"message": "Analysis started", "repo_id": repo_id})),
    )
}

async fn results(
    State(state): State<Arc<MockState>>,
    Path(repo_id): Path<String>,
) -> (StatusCode, Json<Value>) {
    state.fetches.fetch_add(1, Ordering::SeqCst);
    state.fetched_ids.lock().unwrap().push(repo_id);
    let next = state.script.lock().unwrap().pop_front();
    let mut last = state.last.lock().unwrap();
    if let Some(next) = next {
        *last = Some(next);
    }
    match last.clone() {
        Some((status, body)) => (status, Json(body)),
        None => (StatusCode::OK, Json(json!({"status": "processing"}))),
    }
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

pub fn router(state: Arc<MockState>) -> Router {
    Router::new()
        .route("/analyze", post(analyze))
        .route("/results/{repo_id}", get(results))
        .route("/status", get(health))
        .with_state(state)
}

pub fn state(script: Vec<(StatusCode, Value)>, create_status: StatusCode) -> Arc<MockState> {
    Arc::new(MockState {
        script: Mutex::new(script.into()),
        last: Mutex::new(None),
        create_status,
        requests: Mutex::new(Vec::new()),
        fetches: AtomicUsize::new(0),
        fetched_ids: Mutex::new(Vec::new()),
    })
}

/// Serve the mock on an ephemeral port; returns its base URL.
pub async fn spawn(state: Arc<MockState>) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(state);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

pub fn ok(body: Value) -> (StatusCode, Value) {
    (StatusCode::OK, body)
}

/// A full, completed document.
pub fn completed_document() -> Value {
    json!({
        "status": "completed",
        "bugs": [
            {"file": "src/app.ts", "line": 10, "severity": "HIGH", "description": "Unchecked null"}
        ],
        "suggestions": [],
        "readme": "# demo\n\nA demo repository.",
        "structure": "src/\n  app.ts",
        "file_summaries": [{"file": "src/app.ts", "summary": "Application entry point"}],
        "commits": [
            {"hash": "abc1234", "message": "Add app", "author": "dev", "date": "2024-05-02T09:00:00+00:00"},
            {"hash": "def5678", "message": "Initial commit", "author": "dev", "date": "2024-05-01T09:00:00+00:00"}
        ]
    })
}
