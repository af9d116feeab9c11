//! Status events pushed by the server over the live channel.
//!
//! The wire format is a JSON object dispatched on its `status` field, which
//! maps onto a tagged union here so the session can match exhaustively.
//! Unknown status values deserialize into [`StatusEvent::Other`] — forward
//! compatibility is an explicit arm, not a silent drop in parsing.

use serde::Deserialize;

/// A push message describing download progress, completion, or failure.
///
/// Numeric progress fields are optional on the wire (yt-dlp reports `null`
/// for speed/eta early in a transfer); consumers default them to zero.
/// There is no per-download correlation id: the server broadcasts events for
/// whichever single download is running.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "status")]
pub enum StatusEvent {
    /// Transfer in progress.
    #[serde(rename = "downloading")]
    Downloading {
        #[serde(default)]
        progress: Option<f64>,
        /// Transfer speed in bytes per second
        #[serde(default)]
        speed: Option<f64>,
        /// Estimated seconds remaining
        #[serde(default)]
        eta: Option<f64>,
        #[serde(default)]
        downloaded_bytes: Option<f64>,
        #[serde(default)]
        total_bytes: Option<f64>,
    },

    /// Transfer done, post-processing (mux/convert) in progress.
    /// Updates the textual processing message only, never the progress bar.
    #[serde(rename = "finished")]
    Finished {
        #[serde(default)]
        message: Option<String>,
    },

    /// Terminal success with the completed-file descriptor.
    #[serde(rename = "completed")]
    Completed { result: DownloadResult },

    /// Terminal failure reported by the backend.
    #[serde(rename = "error")]
    Error {
        #[serde(default)]
        error: String,
    },

    /// Any status value this client does not know about.
    #[serde(other)]
    Other,
}

/// Result descriptor attached to a `completed` event (shape mirrors the
/// backend's history record).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DownloadResult {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub format_type: Option<String>,
    #[serde(default)]
    pub quality: Option<String>,
    #[serde(default)]
    pub completed_at: Option<String>,
}
