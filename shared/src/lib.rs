//! Shared types for the atelier reservation server
//!
//! Common types used across crates: domain models, unified error types,
//! the API response envelope, and id/time utilities.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorBody, ErrorCategory, ErrorCode};
pub use serde::{Deserialize, Serialize};
