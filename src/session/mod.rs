//! Session controller: translates user intents into backend calls, applies
//! status events, and renders everything through a [`View`].
//!
//! UI state is an explicit machine instead of ad-hoc field mutation:
//!
//! ```text
//! Idle -> Preview -> Progress -> {Completed | Error} -> Idle (reset)
//!      \____________^
//! ```
//!
//! `Preview` (or `Idle`) can go straight to `Progress` — a download never
//! requires a prior successful info fetch.

use crate::api::{ApiClient, DownloadRequest, FormatSelection, HistoryEntry, VideoInfo};
use crate::channel::StatusEvent;
use crate::core::error::AppResult;
use crate::core::validation::require_url;

/// Mutually exclusive UI states (the "visible section" of the original
/// frontend).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UiState {
    #[default]
    Idle,
    Preview,
    Progress,
    Completed,
    Error,
}

/// One progress frame for the view. Values already have their zero defaults
/// applied, so rendering the same frame twice displays the same thing —
/// progress rendering is idempotent by construction.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProgressUpdate {
    /// Percent done, 0.0 - 100.0 (unrounded; views round for display)
    pub progress: f64,
    /// Transfer speed in bytes per second
    pub speed_bps: f64,
    /// Estimated seconds remaining
    pub eta_secs: f64,
}

/// Descriptor of the file a completed download produced.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedFile {
    pub id: String,
    pub filename: String,
    pub title: String,
    /// Direct download link on the server
    pub file_url: String,
}

/// Follow-up action an applied event asks the driver to perform.
///
/// Kept out of [`Session::apply_event`] itself so the controller stays free
/// of network I/O when dispatching events (and trivially testable).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUp {
    /// A download completed; reload the history list exactly once.
    ReloadHistory,
}

/// Rendering surface for the session.
///
/// Implementations must tolerate repeated calls with identical data (every
/// render is reentrant-safe); the session always hands over full state, never
/// deltas.
pub trait View {
    /// Toggle the loading indicator on the triggering control.
    fn set_loading(&mut self, on: bool);
    fn show_preview(&mut self, info: &VideoInfo);
    fn show_progress(&mut self, update: &ProgressUpdate);
    /// Post-transfer processing message; the progress bar is left untouched.
    fn show_processing(&mut self, message: &str);
    fn show_completed(&mut self, file: &CompletedFile);
    fn show_error(&mut self, message: &str);
    /// Full replacement of the history list; an empty slice means the
    /// empty-state placeholder.
    fn show_history(&mut self, entries: &[HistoryEntry]);
}

/// Default processing message when a `finished` event carries none.
const DEFAULT_PROCESSING_MESSAGE: &str = "ファイルを処理中...";

/// The session controller.
///
/// Owns the UI state (current video metadata, the completed-file descriptor)
/// and the view; at most one download is active at a time — starting another
/// supersedes the first in the UI (the backend runs both; no client-side
/// cancellation exists in the protocol).
pub struct Session<V: View> {
    api: ApiClient,
    view: V,
    state: UiState,
    video: Option<VideoInfo>,
    completed: Option<CompletedFile>,
}

impl<V: View> Session<V> {
    pub fn new(api: ApiClient, view: V) -> Self {
        Self {
            api,
            view,
            state: UiState::Idle,
            video: None,
            completed: None,
        }
    }

    pub fn state(&self) -> UiState {
        self.state
    }

    /// Metadata from the last successful info fetch, if any.
    pub fn video(&self) -> Option<&VideoInfo> {
        self.video.as_ref()
    }

    /// Descriptor of the last completed download, if any.
    pub fn completed(&self) -> Option<&CompletedFile> {
        self.completed.as_ref()
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Back to `Idle`, clearing per-download state. This is the "retry"
    /// action of the terminal views.
    pub fn reset(&mut self) {
        self.state = UiState::Idle;
        self.video = None;
        self.completed = None;
    }

    /// Fetches and previews metadata for `input`.
    ///
    /// Empty (after trimming) input fails with a validation error before any
    /// network call. Otherwise exactly one request is issued and the session
    /// ends in `Preview` or `Error` — never `Progress` or `Completed`. The
    /// loading indicator is restored on every exit path.
    pub async fn fetch_video_info(&mut self, input: &str) -> AppResult<()> {
        let url = match require_url(input) {
            Ok(url) => url,
            Err(e) => {
                self.view.show_error(&e.user_message());
                return Err(e);
            }
        };

        self.view.set_loading(true);
        let result = self.api.video_info(&url).await;
        self.view.set_loading(false);

        match result {
            Ok(info) => {
                self.view.show_preview(&info);
                self.video = Some(info);
                self.state = UiState::Preview;
                Ok(())
            }
            Err(e) => {
                self.view.show_error(&e.user_message());
                self.state = UiState::Error;
                Err(e)
            }
        }
    }

    /// Starts a download for `input` with the given format selection.
    ///
    /// Resets the progress display to zero before issuing the call; on
    /// success the session sits in `Progress` until the status channel
    /// delivers a terminal event — the HTTP acknowledgement itself carries no
    /// completion information.
    pub async fn start_download(
        &mut self,
        input: &str,
        selection: FormatSelection,
    ) -> AppResult<()> {
        let url = match require_url(input) {
            Ok(url) => url,
            Err(e) => {
                self.view.show_error(&e.user_message());
                return Err(e);
            }
        };

        // A fresh attempt supersedes whatever was on screen before.
        self.completed = None;
        self.view.show_progress(&ProgressUpdate::default());
        self.state = UiState::Progress;

        let request = DownloadRequest::new(url, selection);
        match self.api.start_download(&request).await {
            Ok(ack) => {
                log::info!(
                    "Download accepted by backend: {}",
                    ack.message.as_deref().unwrap_or("(no message)")
                );
                Ok(())
            }
            Err(e) => {
                self.view.show_error(&e.user_message());
                self.state = UiState::Error;
                Err(e)
            }
        }
    }

    /// Fetches and renders the history list.
    ///
    /// Idempotent and safe to call repeatedly: the view always receives the
    /// complete list, so each call fully replaces what was rendered before.
    /// Fetch failures degrade to the empty-state placeholder instead of the
    /// error view — stale history must never interrupt a running download.
    pub async fn load_history(&mut self) {
        match self.api.history().await {
            Ok(entries) => self.view.show_history(&entries),
            Err(e) => {
                log::warn!("Failed to load history: {}", e);
                self.view.show_history(&[]);
            }
        }
    }

    /// Applies one status event from the live channel.
    ///
    /// Dispatch is an exhaustive match over the event kinds; unknown statuses
    /// are an explicit no-op arm. Returns the follow-up the driver should
    /// perform, if any.
    pub fn apply_event(&mut self, event: StatusEvent) -> Option<FollowUp> {
        match event {
            StatusEvent::Downloading { progress, speed, eta, .. } => {
                let update = ProgressUpdate {
                    progress: progress.unwrap_or(0.0),
                    speed_bps: speed.unwrap_or(0.0),
                    eta_secs: eta.unwrap_or(0.0),
                };
                self.view.show_progress(&update);
                self.state = UiState::Progress;
                None
            }
            StatusEvent::Finished { message } => {
                self.view
                    .show_processing(message.as_deref().unwrap_or(DEFAULT_PROCESSING_MESSAGE));
                self.state = UiState::Progress;
                None
            }
            StatusEvent::Completed { result } => {
                let file = CompletedFile {
                    file_url: self.api.file_url(&result.id),
                    id: result.id,
                    filename: result.filename,
                    title: result.title,
                };
                self.view.show_completed(&file);
                self.completed = Some(file);
                self.state = UiState::Completed;
                Some(FollowUp::ReloadHistory)
            }
            StatusEvent::Error { error } => {
                // Backend-reported errors display exactly like HTTP ones.
                self.view.show_error(&error);
                self.state = UiState::Error;
                None
            }
            StatusEvent::Other => None,
        }
    }
}
