//! Unified error handling
//!
//! One error taxonomy for the whole workspace:
//! - [`ErrorCode`] - numeric codes partitioned by category
//! - [`ErrorCategory`] - category derived from the code range
//! - [`AppError`] - the application error type
//! - [`ApiResponse`] - the `{success, data | error}` HTTP envelope

pub mod category;
pub mod codes;
pub mod http;
pub mod types;

pub use category::ErrorCategory;
pub use codes::ErrorCode;
pub use types::{ApiResponse, AppError, AppResult, ErrorBody};
