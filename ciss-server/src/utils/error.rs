//! Unified error handling
//!
//! Re-exports the shared error types and provides the success-response
//! helpers used by the API handlers.
//!
//! # Error code ranges
//!
//! | Range | Category | Example |
//! |-------|----------|---------|
//! | 0xxx  | General  | 2 validation failed |
//! | 1xxx  | Auth     | 1001 not authenticated |
//! | 2xxx  | Permission | 2002 admin required |
//! | 8xxx  | Employee | 8001 employee not found |
//! | 9xxx  | System   | 9002 database error |

use axum::Json;
use serde::Serialize;

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

/// Create a successful response
pub fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success(data))
}

/// Create a successful response with custom message
pub fn ok_with_message<T: Serialize>(data: T, message: impl Into<String>) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success_with_message(message, data))
}
