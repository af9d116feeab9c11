//! Live status channel: a persistent WebSocket carrying [`StatusEvent`]s
//! from the server, exposed as a typed event stream.
//!
//! The connection is owned by a spawned task. On any disconnect — connect
//! failure, read error, or a server close frame — the task schedules exactly
//! one reconnection attempt after a fixed delay and keeps doing so
//! indefinitely (no backoff growth, no retry cap; this is a single-user local
//! tool). Dropping or shutting down the handle cancels the task, so a fresh
//! channel fully replaces the prior one and no stale dispatch survives.

pub mod event;

pub use event::{DownloadResult, StatusEvent};

use futures_util::StreamExt;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::config;

/// Handle to the running channel task.
///
/// Receives parsed events via [`next_event`](Self::next_event); tear down
/// with [`shutdown`](Self::shutdown) to stop the reconnect loop.
pub struct StatusChannel {
    events: mpsc::Receiver<StatusEvent>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl StatusChannel {
    /// Spawns the channel task against the given WebSocket endpoint.
    ///
    /// `reconnect_delay` is the fixed pause between a disconnect and the next
    /// connection attempt (production value: [`config::channel::reconnect_delay`]).
    pub fn connect(ws_url: Url, reconnect_delay: Duration) -> Self {
        let (tx, rx) = mpsc::channel(config::channel::EVENT_BUFFER);
        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();

        let task = tokio::spawn(async move {
            run_channel(ws_url, reconnect_delay, tx, task_cancel).await;
        });

        Self { events: rx, cancel, task }
    }

    /// Next event from the server.
    ///
    /// Returns `None` only after [`shutdown`](Self::shutdown) (or an aborted
    /// task); reconnect gaps simply make this wait longer.
    pub async fn next_event(&mut self) -> Option<StatusEvent> {
        self.events.recv().await
    }

    /// Cancels the channel task and waits for it to finish.
    ///
    /// Awaits the handle through a borrow: the struct has a `Drop` impl, so
    /// the handle cannot be moved out of it.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Err(e) = (&mut self.task).await {
            if !e.is_cancelled() {
                log::warn!("Status channel task ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for StatusChannel {
    fn drop(&mut self) {
        // Belt and braces: shutdown() is the normal path, but a dropped
        // handle must not leave a reconnect loop running.
        self.cancel.cancel();
    }
}

/// Connect / read / reconnect loop. Exits only on cancellation.
async fn run_channel(
    ws_url: Url,
    reconnect_delay: Duration,
    tx: mpsc::Sender<StatusEvent>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            connected = connect_async(ws_url.as_str()) => match connected {
                Ok((ws, _response)) => {
                    log::info!("Status channel connected: {}", ws_url);
                    read_events(ws, &tx, &cancel).await;
                }
                Err(e) => {
                    log::warn!("Status channel connect failed: {}", e);
                }
            }
        }

        if cancel.is_cancelled() || tx.is_closed() {
            break;
        }

        log::info!(
            "Status channel disconnected, reconnecting in {}s",
            reconnect_delay.as_secs_f64()
        );
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(reconnect_delay) => {}
        }
    }

    log::info!("Status channel stopped");
}

/// Reads one connection until it drops. Malformed payloads are logged and
/// dropped; the connection is kept (one bad frame is not worth a reconnect
/// gap). Binary and control frames are ignored — tungstenite answers pings
/// internally.
async fn read_events<S>(
    mut ws: tokio_tungstenite::WebSocketStream<S>,
    tx: &mpsc::Sender<StatusEvent>,
    cancel: &CancellationToken,
) where
    S: tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin,
{
    loop {
        let message = tokio::select! {
            _ = cancel.cancelled() => return,
            msg = ws.next() => msg,
        };

        match message {
            Some(Ok(Message::Text(text))) => match serde_json::from_str::<StatusEvent>(&text) {
                Ok(event) => {
                    if tx.send(event).await.is_err() {
                        // Receiver gone; the outer loop will exit.
                        return;
                    }
                }
                Err(e) => {
                    log::warn!("Dropping malformed status payload ({}): {}", e, text);
                }
            },
            Some(Ok(Message::Close(frame))) => {
                log::info!("Status channel closed by server: {:?}", frame);
                return;
            }
            Some(Ok(_)) => {} // binary / ping / pong
            Some(Err(e)) => {
                log::warn!("Status channel read error: {}", e);
                return;
            }
            None => {
                log::info!("Status channel stream ended");
                return;
            }
        }
    }
}
