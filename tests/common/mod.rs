//! Common test utilities
//!
//! This module is shared across all integration tests

#![allow(dead_code)]

pub mod backend;
pub mod views;

pub use backend::MockBackend;
pub use views::RecordingView;
