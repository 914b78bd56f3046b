//! Stored File Handler

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::core::ServerState;
use crate::utils::AppError;

/// Serve a stored document
///
/// The blob store rejects traversal outside its root before any read.
pub async fn serve(
    State(state): State<ServerState>,
    Path(path): Path<String>,
) -> Result<Response, AppError> {
    let full_path = state.storage.path_for(&path)?;
    let bytes = tokio::fs::read(&full_path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            AppError::not_found(format!("File {}", path))
        } else {
            AppError::storage(format!("Failed to read file: {}", e))
        }
    })?;

    let mime = mime_guess::from_path(&full_path)
        .first_or_octet_stream()
        .to_string();

    Ok(([(header::CONTENT_TYPE, mime)], bytes).into_response())
}
