//! Core utilities: errors, logging and input validation.

pub mod error;
pub mod logging;
pub mod validation;

pub use error::{AppError, AppResult};
pub use logging::init_logger;
