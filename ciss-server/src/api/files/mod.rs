//! Stored File API Module
//!
//! Serves uploaded documents back out of the blob store. URLs recorded on
//! employee records all point here.

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// Files router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/files", routes())
}

fn routes() -> Router<ServerState> {
    Router::new().route("/{*path}", get(handler::serve))
}
