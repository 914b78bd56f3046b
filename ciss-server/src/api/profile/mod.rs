//! Public Profile API Module
//!
//! Employee self-service view and update, reachable from the QR code
//! without a login.

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// Profile router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/profile", routes())
}

fn routes() -> Router<ServerState> {
    Router::new().route(
        "/{id}",
        get(handler::get_profile).patch(handler::update_profile),
    )
}
