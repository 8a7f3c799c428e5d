//! Utilities: logging setup and shared error re-exports

pub mod logger;

pub use shared::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
