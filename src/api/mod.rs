//! HTTP client for the download server API.
//!
//! Endpoints consumed (relative to the configured server base):
//! - `POST /api/video-info`  — metadata preview
//! - `POST /api/download`    — start a download (acknowledgement only)
//! - `GET  /api/history`     — completed downloads
//! - `GET  /api/downloads/{id}/file` — direct file link (never fetched here)
//!
//! Success bodies are wrapped in `{"success": true, "data": ...}`; error
//! bodies carry `{"detail": "..."}` with a non-2xx status.

pub mod types;

use crate::config;
use crate::core::error::{AppError, AppResult};
use serde::Deserialize;
use url::Url;

pub use types::{
    AudioBitrate, DownloadAck, DownloadRequest, FormatSelection, HistoryEntry, Quality, VideoInfo,
};

/// Generic success envelope used by the backend.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    #[allow(dead_code)]
    success: bool,
    data: T,
}

/// Error body shape for non-2xx responses (FastAPI convention).
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

/// Fallback message when the backend gives no usable error detail.
const GENERIC_BACKEND_ERROR: &str = "サーバーでエラーが発生しました";

/// Client for the download server.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base: Url,
    http: reqwest::Client,
}

impl ApiClient {
    /// Creates a client for the given server base URL (e.g.
    /// `http://127.0.0.1:8000`).
    pub fn new(base: Url) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config::network::timeout())
            .build()?;
        Ok(Self { base, http })
    }

    /// Server base this client talks to.
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// WebSocket endpoint derived from the server base: the scheme mirrors
    /// the transport security of the base (`http` -> `ws`, `https` -> `wss`),
    /// path `/ws`.
    pub fn ws_url(&self) -> AppResult<Url> {
        let mut url = self.base.join("/ws")?;
        let scheme = match url.scheme() {
            "https" => "wss",
            _ => "ws",
        };
        url.set_scheme(scheme)
            .map_err(|_| AppError::Channel(format!("cannot derive ws scheme from {}", self.base)))?;
        Ok(url)
    }

    /// Direct download link for a completed file. Used as a link target only.
    pub fn file_url(&self, id: &str) -> String {
        download_file_url(&self.base, id)
    }

    /// `POST /api/video-info` — fetch metadata for a URL.
    pub async fn video_info(&self, url: &str) -> AppResult<VideoInfo> {
        let endpoint = self.base.join("/api/video-info")?;
        let resp = self
            .http
            .post(endpoint)
            .json(&serde_json::json!({ "url": url }))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(backend_error(resp).await);
        }

        let envelope: Envelope<VideoInfo> = resp.json().await?;
        Ok(envelope.data)
    }

    /// `POST /api/download` — ask the backend to start a download.
    ///
    /// The response acknowledges the request only; progress and the final
    /// result arrive asynchronously on the status channel.
    pub async fn start_download(&self, request: &DownloadRequest) -> AppResult<DownloadAck> {
        let endpoint = self.base.join("/api/download")?;
        let resp = self.http.post(endpoint).json(request).send().await?;

        if !resp.status().is_success() {
            return Err(backend_error(resp).await);
        }

        Ok(resp.json().await?)
    }

    /// `GET /api/history` — list completed downloads, newest first.
    pub async fn history(&self) -> AppResult<Vec<HistoryEntry>> {
        let endpoint = self.base.join("/api/history")?;
        let resp = self.http.get(endpoint).send().await?;

        if !resp.status().is_success() {
            return Err(backend_error(resp).await);
        }

        let envelope: Envelope<Vec<HistoryEntry>> = resp.json().await?;
        Ok(envelope.data)
    }
}

/// Converts a non-2xx response into `AppError::Backend`, preferring the
/// server-provided `detail` message over the generic fallback.
async fn backend_error(resp: reqwest::Response) -> AppError {
    let status = resp.status();
    let message = match resp.json::<ErrorBody>().await {
        Ok(body) if !body.detail.trim().is_empty() => body.detail,
        _ => GENERIC_BACKEND_ERROR.to_string(),
    };
    log::warn!("Backend request failed: HTTP {} - {}", status, message);
    AppError::Backend { status, message }
}

/// Direct download link for a completed file on the given server base.
///
/// The single source for this URL shape; everything that prints a file link
/// goes through here.
pub fn download_file_url(base: &Url, id: &str) -> String {
    let base = base.as_str();
    if base.ends_with('/') {
        format!("{}api/downloads/{}/file", base, id)
    } else {
        format!("{}/api/downloads/{}/file", base, id)
    }
}
