//! Employee API Module

mod handler;

use axum::{Router, middleware, routing::get, routing::post};

use crate::auth::require_admin;
use crate::core::ServerState;

/// Employee router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/employees", routes())
}

fn routes() -> Router<ServerState> {
    // Read routes: any authenticated operator
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/kit", get(handler::download_kit));

    // Mutations are admin-only
    let manage_routes = Router::new()
        .route(
            "/{id}",
            axum::routing::patch(handler::update).delete(handler::delete),
        )
        .route("/{id}/status", post(handler::change_status))
        .route("/{id}/documents/{slot}", post(handler::replace_document))
        .route("/{id}/qr", post(handler::regenerate_qr))
        .layer(middleware::from_fn(require_admin));

    read_routes.merge(manage_routes)
}
