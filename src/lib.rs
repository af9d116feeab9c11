//! Tubedeck - terminal client for a yt-dlp web download server
//!
//! This library provides all the functionality behind the `tubedeck` binary:
//! backend API calls, the live status channel, session state handling and
//! console rendering.
//!
//! # Module Structure
//!
//! - `core`: errors, logging, input validation
//! - `api`: HTTP client for the backend endpoints and their wire types
//! - `channel`: persistent WebSocket status channel with auto-reconnect
//! - `session`: session controller (UI state machine) and the `View` trait
//! - `render`: pure formatting helpers and the console view

pub mod api;
pub mod channel;
pub mod cli;
pub mod config;
pub mod core;
pub mod render;
pub mod session;

// Re-export commonly used types for convenience
pub use api::ApiClient;
pub use channel::{StatusChannel, StatusEvent};
pub use core::{AppError, AppResult};
pub use session::{Session, UiState, View};
