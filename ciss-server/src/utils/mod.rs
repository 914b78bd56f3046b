//! Utility module - common helpers and types
//!
//! - [`AppError`] / [`ApiResponse`] - unified error and response types (from shared)
//! - [`logger`] - tracing setup
//! - [`validation`] - field format validators

pub mod error;
pub mod logger;
pub mod validation;

pub use error::{ApiResponse, AppError, AppResult, ok, ok_with_message};
