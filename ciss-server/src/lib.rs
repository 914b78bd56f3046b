//! CISS Registry Server
//!
//! Employee registry for a security-services company: enrollment with
//! document verification, a searchable directory, per-record document
//! storage, QR identity codes and a printable profile kit.
//!
//! # Module layout
//!
//! ```text
//! ciss-server/src/
//! ├── core/         # Configuration, state, HTTP server
//! ├── auth/         # JWT authentication and admin gating
//! ├── api/          # HTTP routes and handlers
//! ├── db/           # Embedded SurrealDB models and repositories
//! ├── directory.rs  # Directory pagination strategies
//! ├── services/     # QR, PDF, storage, verification, employee ids
//! └── utils/        # Logging, validation, response helpers
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod directory;
pub mod services;
pub mod utils;

pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{ApiResponse, AppError, AppResult};

pub use utils::logger::{init_logger, init_logger_with_file};

/// Load `.env` and initialize logging
///
/// File logging is only enabled when the configured log directory already
/// exists, so a fresh checkout logs to stderr.
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(None, log_dir.as_deref());

    Ok(())
}
