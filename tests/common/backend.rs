//! In-process mock of the download server's HTTP API.
//!
//! Serves the three endpoints the client consumes, with per-endpoint call
//! counters and scriptable responses, on an ephemeral local port.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use url::Url;

/// Scripted reply for `POST /api/video-info`.
#[derive(Clone)]
pub enum InfoReply {
    Ok(Value),
    Err(u16, String),
}

#[derive(Clone)]
struct BackendState {
    info_calls: Arc<AtomicUsize>,
    download_calls: Arc<AtomicUsize>,
    history_calls: Arc<AtomicUsize>,
    info_reply: Arc<Mutex<InfoReply>>,
    history: Arc<Mutex<Vec<Value>>>,
    last_download_body: Arc<Mutex<Option<Value>>>,
}

pub struct MockBackend {
    pub addr: SocketAddr,
    state: BackendState,
}

impl MockBackend {
    /// Starts the mock server on an ephemeral port.
    pub async fn spawn() -> Self {
        let state = BackendState {
            info_calls: Arc::new(AtomicUsize::new(0)),
            download_calls: Arc::new(AtomicUsize::new(0)),
            history_calls: Arc::new(AtomicUsize::new(0)),
            info_reply: Arc::new(Mutex::new(InfoReply::Ok(json!({
                "title": "Test",
                "duration": 125,
                "uploader": "Chan",
                "view_count": 1000,
                "thumbnail": "",
                "description": "",
            })))),
            history: Arc::new(Mutex::new(Vec::new())),
            last_download_body: Arc::new(Mutex::new(None)),
        };

        let app = Router::new()
            .route("/api/video-info", post(video_info))
            .route("/api/download", post(start_download))
            .route("/api/history", get(history))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn base_url(&self) -> Url {
        Url::parse(&format!("http://{}", self.addr)).unwrap()
    }

    pub fn info_calls(&self) -> usize {
        self.state.info_calls.load(Ordering::SeqCst)
    }

    pub fn download_calls(&self) -> usize {
        self.state.download_calls.load(Ordering::SeqCst)
    }

    pub fn history_calls(&self) -> usize {
        self.state.history_calls.load(Ordering::SeqCst)
    }

    /// Replaces the scripted `POST /api/video-info` reply.
    pub fn set_info_reply(&self, reply: InfoReply) {
        *self.state.info_reply.lock().unwrap() = reply;
    }

    /// Replaces the history the server reports.
    pub fn set_history(&self, entries: Vec<Value>) {
        *self.state.history.lock().unwrap() = entries;
    }

    /// Body of the most recent `POST /api/download`, if any.
    pub fn last_download_body(&self) -> Option<Value> {
        self.state.last_download_body.lock().unwrap().clone()
    }
}

async fn video_info(
    State(state): State<BackendState>,
    Json(_body): Json<Value>,
) -> impl IntoResponse {
    state.info_calls.fetch_add(1, Ordering::SeqCst);
    let reply = state.info_reply.lock().unwrap().clone();
    match reply {
        InfoReply::Ok(data) => (
            StatusCode::OK,
            Json(json!({ "success": true, "data": data })),
        ),
        InfoReply::Err(status, detail) => (
            StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_REQUEST),
            Json(json!({ "detail": detail })),
        ),
    }
}

async fn start_download(
    State(state): State<BackendState>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    state.download_calls.fetch_add(1, Ordering::SeqCst);
    *state.last_download_body.lock().unwrap() = Some(body);
    (
        StatusCode::OK,
        Json(json!({ "success": true, "message": "ダウンロードを開始しました" })),
    )
}

async fn history(State(state): State<BackendState>) -> impl IntoResponse {
    state.history_calls.fetch_add(1, Ordering::SeqCst);
    let entries = state.history.lock().unwrap().clone();
    (
        StatusCode::OK,
        Json(json!({ "success": true, "data": entries })),
    )
}
