//! Enrollment API Module
//!
//! Public endpoint: new guards enroll themselves (or are enrolled at a
//! field office) without a login.

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

/// Enrollment router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/enroll", routes())
}

fn routes() -> Router<ServerState> {
    Router::new().route("/", post(handler::enroll))
}
