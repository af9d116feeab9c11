use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

/// Configuration constants for the client

/// Base URL of the download server
/// Read once at startup from TUBEDECK_SERVER environment variable.
/// The WebSocket endpoint is derived from this (http -> ws, https -> wss).
pub static SERVER_URL: Lazy<String> = Lazy::new(|| {
    env::var("TUBEDECK_SERVER").unwrap_or_else(|_| "http://127.0.0.1:8000".to_string())
});

/// Log file path
/// Read from TUBEDECK_LOG_FILE environment variable
pub static LOG_FILE_PATH: Lazy<String> = Lazy::new(|| {
    env::var("TUBEDECK_LOG_FILE").unwrap_or_else(|_| "tubedeck.log".to_string())
});

/// Network configuration
pub mod network {
    use super::Duration;

    /// Request timeout for HTTP requests (in seconds)
    /// Metadata extraction on the backend can take a while for slow hosts.
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }
}

/// Live status channel configuration
pub mod channel {
    use super::Duration;

    /// Fixed delay before a reconnection attempt after any disconnect
    /// (in seconds). No backoff growth and no retry cap: the channel keeps
    /// trying for as long as the client runs.
    pub const RECONNECT_DELAY_SECS: u64 = 3;

    /// Reconnect delay duration
    pub fn reconnect_delay() -> Duration {
        Duration::from_secs(RECONNECT_DELAY_SECS)
    }

    /// Capacity of the event queue between the channel task and the session
    pub const EVENT_BUFFER: usize = 64;
}

/// Validation configuration
pub mod validation {
    /// Maximum URL length (RFC 7230 recommends 8000, but we use 2048 for safety).
    /// Longer URLs are still sent to the backend; this only triggers a log warning.
    pub const MAX_URL_LENGTH: usize = 2048;
}

/// History configuration
pub mod history {
    /// Default number of history entries shown by `tubedeck history`
    pub const DEFAULT_LIMIT: usize = 50;
}
