//! Employee Handlers
//!
//! Directory listing, profile edits, document replacement, QR regeneration,
//! profile kit download and deletion with blob cascade.

use axum::Json;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use serde_json::{Map, Value};
use shared::ErrorCode;

use crate::core::ServerState;
use crate::db::models::{
    DocumentSlot, Employee, EmployeeUpdate, UpdateOutcome, build_update_document,
};
use crate::db::repository::RepoError;
use crate::directory::{DirectoryPage, DirectoryParams, DirectoryQuery, PaginatedQuery};
use crate::services::{pdf, qr};
use crate::utils::validation::{validate_email, validate_ifsc, validate_pan};
use crate::utils::{ApiResponse, AppError, ok, ok_with_message};

/// Map repository errors onto the employee-specific error codes
fn employee_err(err: RepoError) -> AppError {
    match err {
        RepoError::NotFound(msg) => AppError::with_message(ErrorCode::EmployeeNotFound, msg),
        RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::EmployeePhoneExists, msg),
        other => other.into(),
    }
}

async fn load_employee(state: &ServerState, id: &str) -> Result<Employee, AppError> {
    state
        .db
        .employees()
        .find_by_id(id)
        .await
        .map_err(employee_err)?
        .ok_or_else(|| AppError::new(ErrorCode::EmployeeNotFound))
}

/// Directory listing
///
/// Cursor-paged by default; a `search` parameter switches to token search
/// with in-memory paging. See [`crate::directory`].
pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<DirectoryParams>,
) -> Result<Json<ApiResponse<DirectoryPage>>, AppError> {
    let page = DirectoryQuery::from_params(params)
        .fetch_page(&state.db.employees())
        .await?;
    Ok(ok(page))
}

/// Single record lookup
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Employee>>, AppError> {
    let employee = load_employee(&state, &id).await?;
    Ok(ok(employee))
}

/// Partial profile update
///
/// Only fields that differ from the stored record are written; an update
/// identical to the record reports "no changes" without touching the
/// database. Status and marital-status invariants are enforced before any
/// write.
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(req): Json<EmployeeUpdate>,
) -> Result<Json<ApiResponse<Employee>>, AppError> {
    if let Some(ifsc) = &req.ifsc_code {
        validate_ifsc(ifsc, "ifscCode")?;
    }
    validate_pan(&req.pan_number, "panNumber")?;
    if let Some(email) = &req.email_address {
        validate_email(email, "emailAddress")?;
    }

    let existing = load_employee(&state, &id).await?;

    match build_update_document(&existing, &req)? {
        UpdateOutcome::Unchanged => Ok(ok_with_message(existing, "No changes to save")),
        UpdateOutcome::Changed(doc) => {
            let changed_fields: Vec<&String> = doc.keys().collect();
            tracing::info!(id = %id, fields = ?changed_fields, "employee updated");
            let updated = state
                .db
                .employees()
                .merge(&id, doc)
                .await
                .map_err(employee_err)?;
            Ok(ok(updated))
        }
    }
}

/// Requested status transition
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    pub status: crate::db::models::EmployeeStatus,
    #[serde(default)]
    pub exit_date: Option<String>,
}

/// Change employment status
///
/// Moving to Exited requires an exit date; moving away from Exited clears
/// any stored one. Both rules live in the shared diff builder, so PATCH
/// and this route cannot disagree.
pub async fn change_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(req): Json<StatusChange>,
) -> Result<Json<ApiResponse<Employee>>, AppError> {
    let existing = load_employee(&state, &id).await?;

    let update = EmployeeUpdate {
        status: Some(req.status),
        exit_date: req.exit_date,
        ..Default::default()
    };

    match build_update_document(&existing, &update)? {
        UpdateOutcome::Unchanged => Ok(ok_with_message(existing, "No changes to save")),
        UpdateOutcome::Changed(doc) => {
            tracing::info!(id = %id, status = ?req.status, "employee status changed");
            let updated = state
                .db
                .employees()
                .merge(&id, doc)
                .await
                .map_err(employee_err)?;
            Ok(ok(updated))
        }
    }
}

/// Delete a record and best-effort delete its stored documents
///
/// The record goes first; blob deletion tolerates already-missing files
/// and only warns on other failures, leaving orphans rather than failing
/// the request. The QR code lives inline on the record and needs no
/// cleanup.
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let deleted = state.db.employees().delete(&id).await.map_err(employee_err)?;

    for (slot, url) in deleted.document_urls() {
        if let Err(e) = state.storage.delete_by_url(url) {
            tracing::warn!(
                id = %id,
                slot = slot.category(),
                url = %url,
                error = %e,
                "failed to delete document blob"
            );
        }
    }

    tracing::info!(id = %id, employee_id = %deleted.employee_id, "employee deleted");
    Ok(ok(()))
}

/// Replace one document slot
///
/// Ordered pipeline: store the new blob, point the record at it, then
/// best-effort delete the superseded blob. A failure before the record
/// write leaves the old document in place.
pub async fn replace_document(
    State(state): State<ServerState>,
    Path((id, slot)): Path<(String, String)>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<Employee>>, AppError> {
    let slot = DocumentSlot::from_slug(&slot)
        .ok_or_else(|| AppError::with_message(ErrorCode::UnknownDocumentSlot, format!(
            "Unknown document slot '{}'",
            slot
        )))?;

    let existing = load_employee(&state, &id).await?;

    let (data, content_type) = read_file_field(&mut multipart).await?;

    let new_url = state
        .storage
        .store(&existing.phone_number, slot.category(), &data, &content_type)?;

    let mut doc = Map::new();
    doc.insert(slot.field_key().to_string(), Value::String(new_url.clone()));
    let updated = state
        .db
        .employees()
        .merge(&id, doc)
        .await
        .map_err(employee_err)?;

    if let Some(old_url) = existing.document_url(slot) {
        if let Err(e) = state.storage.delete_by_url(old_url) {
            tracing::warn!(id = %id, url = %old_url, error = %e, "failed to delete superseded blob");
        }
    }

    tracing::info!(id = %id, slot = slot.category(), "document replaced");
    Ok(ok(updated))
}

/// Regenerate the identity QR code
///
/// The payload is rebuilt from the current id/name/phone; the previous
/// data URL is simply overwritten.
pub async fn regenerate_qr(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Employee>>, AppError> {
    let existing = load_employee(&state, &id).await?;

    let data_url = qr::generate_qr_data_url(
        &existing.employee_id,
        &existing.full_name,
        &existing.phone_number,
    )?;

    let mut doc = Map::new();
    doc.insert("qrCodeUrl".to_string(), Value::String(data_url));
    let updated = state
        .db
        .employees()
        .merge(&id, doc)
        .await
        .map_err(employee_err)?;

    tracing::info!(id = %id, "QR code regenerated");
    Ok(ok(updated))
}

/// Download the profile kit PDF
///
/// Photo and signature blobs are loaded best-effort; a missing or
/// unreadable image leaves its spot in the kit empty rather than failing
/// the download.
pub async fn download_kit(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let employee = load_employee(&state, &id).await?;

    let qr_image = match &employee.qr_code_url {
        Some(url) => pdf::decode_data_url_image(url).ok(),
        None => {
            let url = qr::generate_qr_data_url(
                &employee.employee_id,
                &employee.full_name,
                &employee.phone_number,
            )?;
            pdf::decode_data_url_image(&url).ok()
        }
    };

    let images = pdf::KitImages {
        photo: load_blob_image(&state, &id, employee.profile_picture_url.as_deref()),
        signature: load_blob_image(&state, &id, employee.signature_url.as_deref()),
        qr: qr_image,
    };

    let bytes = pdf::render_profile_kit(&employee, &images)?;

    let filename = format!("{}_Profile_Kit.pdf", employee.full_name.replace(' ', "_"));
    tracing::info!(id = %id, size = bytes.len(), "profile kit rendered");

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    )
        .into_response())
}

fn load_blob_image(
    state: &ServerState,
    id: &str,
    url: Option<&str>,
) -> Option<image::DynamicImage> {
    let url = url?;
    match state.storage.read_by_url(url) {
        Ok(bytes) => match image::load_from_memory(&bytes) {
            Ok(img) => Some(img),
            Err(e) => {
                tracing::warn!(id = %id, url = %url, error = %e, "stored image is unreadable");
                None
            }
        },
        Err(e) => {
            tracing::warn!(id = %id, url = %url, error = %e, "failed to load stored image");
            None
        }
    }
}

/// Pull the single `file` field out of a multipart body
async fn read_file_field(multipart: &mut Multipart) -> Result<(Vec<u8>, String), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Invalid multipart request: {}", e)))?
    {
        if field.name() == Some("file") {
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::validation(format!("Multipart error: {}", e)))?
                .to_vec();
            return Ok((data, content_type));
        }
    }
    Err(AppError::validation(
        "No 'file' field found. Field name must be 'file'",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::Utc;
    use tempfile::TempDir;

    use crate::auth::JwtService;
    use crate::core::Config;
    use crate::db::DbService;
    use crate::db::models::{EmployeeStatus, MaritalStatus};
    use crate::services::{BlobStore, DocumentVerifier};

    async fn test_state() -> (TempDir, ServerState) {
        let dir = tempfile::tempdir().unwrap();
        let state = ServerState {
            config: Config::with_overrides(dir.path().to_string_lossy().into_owned(), 0),
            db: DbService::new_memory().await.unwrap(),
            jwt_service: Arc::new(JwtService::new()),
            storage: BlobStore::new(dir.path().join("uploads")),
            verifier: DocumentVerifier::new(None),
            started_at: Utc::now(),
        };
        (dir, state)
    }

    fn sample_employee() -> Employee {
        Employee {
            id: None,
            employee_id: "CISS/ABC/2024-25/042".to_string(),
            full_name: "Jane Doe".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            gender: "Female".to_string(),
            date_of_birth: "1990-01-15".to_string(),
            father_name: "John Doe".to_string(),
            mother_name: "Mary Doe".to_string(),
            marital_status: MaritalStatus::Single,
            spouse_name: None,
            phone_number: "9876543210".to_string(),
            email_address: "jane@example.com".to_string(),
            district: "Kamrup".to_string(),
            full_address: "12 Station Road".to_string(),
            client_name: "ABC Industries".to_string(),
            resource_id_number: None,
            joining_date: "2024-05-01".to_string(),
            status: EmployeeStatus::Active,
            exit_date: None,
            identity_proof_type: "Aadhaar".to_string(),
            identity_proof_number: "1234 5678 9012".to_string(),
            address_proof_type: "Aadhaar".to_string(),
            address_proof_number: "1234 5678 9012".to_string(),
            bank_name: "State Bank".to_string(),
            bank_account_number: "00112233445".to_string(),
            ifsc_code: "SBIN0001234".to_string(),
            pan_number: None,
            epf_uan_number: None,
            esic_number: None,
            profile_picture_url: None,
            signature_url: None,
            bank_passbook_statement_url: None,
            police_clearance_certificate_url: None,
            identity_proof_front_url: None,
            identity_proof_back_url: None,
            address_proof_front_url: None,
            address_proof_back_url: None,
            qr_code_url: None,
            searchable_fields: vec!["JANE".into(), "DOE".into(), "9876543210".into()],
            created_at: "2024-05-01T10:00:00Z".to_string(),
            updated_at: "2024-05-01T10:00:00Z".to_string(),
        }
    }

    #[tokio::test]
    async fn test_delete_cascades_to_stored_documents() {
        let (_dir, state) = test_state().await;
        let pdf = b"%PDF-1.4\nminimal".to_vec();

        let passbook = state
            .storage
            .store("9876543210", "bank-passbook", &pdf, "application/pdf")
            .unwrap();
        let id_front = state
            .storage
            .store("9876543210", "identity-proof-front", &pdf, "application/pdf")
            .unwrap();

        let mut employee = sample_employee();
        employee.bank_passbook_statement_url = Some(passbook.clone());
        employee.identity_proof_front_url = Some(id_front.clone());
        // A URL whose blob is already gone must not fail the deletion
        employee.police_clearance_certificate_url =
            Some("/api/files/employees/9876543210/police-clearance/0_dead.pdf".to_string());

        let created = state.db.employees().create(employee).await.unwrap();
        let id = created.id.as_ref().unwrap().to_string();

        delete(State(state.clone()), Path(id.clone())).await.unwrap();

        // Record gone, one storage delete per populated URL
        assert!(state.db.employees().find_by_id(&id).await.unwrap().is_none());
        assert!(state.storage.read_by_url(&passbook).is_err());
        assert!(state.storage.read_by_url(&id_front).is_err());
    }

    #[tokio::test]
    async fn test_status_change_enforces_exit_date() {
        let (_dir, state) = test_state().await;
        let created = state.db.employees().create(sample_employee()).await.unwrap();
        let id = created.id.as_ref().unwrap().to_string();

        let err = change_status(
            State(state.clone()),
            Path(id.clone()),
            Json(StatusChange {
                status: EmployeeStatus::Exited,
                exit_date: None,
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, shared::ErrorCode::ExitDateRequired);

        let resp = change_status(
            State(state),
            Path(id),
            Json(StatusChange {
                status: EmployeeStatus::Exited,
                exit_date: Some("2025-03-31".to_string()),
            }),
        )
        .await
        .unwrap();
        let updated = resp.0.data.unwrap();
        assert_eq!(updated.status, EmployeeStatus::Exited);
        assert_eq!(updated.exit_date.as_deref(), Some("2025-03-31"));
    }
}
