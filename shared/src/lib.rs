//! Shared types for the CISS guard registry
//!
//! Types used by both the server and any API consumer:
//! - [`error`]: unified error codes, [`AppError`] and [`ApiResponse`]
//! - [`client`]: request/response DTOs for the auth endpoints

pub mod client;
pub mod error;

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
