use reqwest::StatusCode;
use thiserror::Error;

/// Centralized error types for the application
///
/// All errors in the client are converted to this enum for consistent
/// handling. Uses `thiserror` for automatic conversion and display
/// formatting.
///
/// The variants mirror the error taxonomy of the protocol:
/// - `Validation` — caught before any network call (empty URL)
/// - `Backend` — the server answered with a non-success status; the message
///   is the server-provided `detail` when present
/// - `Http` / `Channel` — transport faults; channel faults are handled by
///   silent reconnection and never reach the user directly
#[derive(Error, Debug)]
pub enum AppError {
    /// Input rejected before any network call
    #[error("{0}")]
    Validation(String),

    /// Non-success HTTP response from the backend.
    /// Display shows only the message; the status code is for logs.
    #[error("{message}")]
    Backend { status: StatusCode, message: String },

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Status channel (WebSocket) errors
    #[error("Channel error: {0}")]
    Channel(String),

    /// JSON (de)serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// URL parsing errors
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    /// Anyhow errors (for general error handling)
    #[error("Application error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// True when the error was raised before any request left the client.
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }

    /// Message suitable for the error view: backend `detail` when present,
    /// transport description otherwise.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_displays_message_only() {
        let err = AppError::Backend {
            status: StatusCode::BAD_REQUEST,
            message: "動画情報の取得に失敗しました".to_string(),
        };
        assert_eq!(err.to_string(), "動画情報の取得に失敗しました");
    }

    #[test]
    fn test_is_validation() {
        assert!(AppError::Validation("empty".into()).is_validation());
        let backend = AppError::Backend {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "boom".into(),
        };
        assert!(!backend.is_validation());
    }
}
