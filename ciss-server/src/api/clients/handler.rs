//! Client Handlers
//!
//! Employees reference clients by display name, not id, so renaming a
//! client leaves historical employee records pointing at the old name.
//! Deletion likewise never cascades into employee records.

use axum::Json;
use axum::extract::{Path, State};
use shared::ErrorCode;
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::{Client, ClientCreate, ClientUpdate};
use crate::db::repository::RepoError;
use crate::utils::{ApiResponse, AppError, ok};

/// Map repository errors onto the client-specific error codes
fn client_err(err: RepoError) -> AppError {
    match err {
        RepoError::NotFound(msg) => AppError::with_message(ErrorCode::ClientNotFound, msg),
        RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::ClientNameExists, msg),
        other => other.into(),
    }
}

/// List all clients, ordered by name
pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<ApiResponse<Vec<Client>>>, AppError> {
    let clients = state.db.clients().find_all().await?;
    Ok(ok(clients))
}

/// Create a client
pub async fn create(
    State(state): State<ServerState>,
    Json(req): Json<ClientCreate>,
) -> Result<Json<ApiResponse<Client>>, AppError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let client = state.db.clients().create(req).await.map_err(client_err)?;
    tracing::info!(name = %client.name, "client created");
    Ok(ok(client))
}

/// Rename or reconfigure a client
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(req): Json<ClientUpdate>,
) -> Result<Json<ApiResponse<Client>>, AppError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let client = state
        .db
        .clients()
        .update(&id, req)
        .await
        .map_err(client_err)?;
    tracing::info!(id = %id, name = %client.name, "client updated");
    Ok(ok(client))
}

/// Delete a client
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    state.db.clients().delete(&id).await.map_err(client_err)?;
    tracing::info!(id = %id, "client deleted");
    Ok(ok(()))
}
