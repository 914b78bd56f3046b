//! Public Profile Handler

use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;
use shared::ErrorCode;

use crate::core::ServerState;
use crate::db::models::{Employee, EmployeeUpdate, UpdateOutcome, build_update_document};
use crate::db::repository::RepoError;
use crate::utils::validation::{validate_email, validate_ifsc, validate_pan};
use crate::utils::{ApiResponse, AppError, ok, ok_with_message};

/// Public subset of an employee record
///
/// Bank, statutory and proof numbers are withheld from the unauthenticated
/// view; the QR landing page only needs identity and posting facts.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub employee_id: String,
    pub full_name: String,
    pub gender: String,
    pub district: String,
    pub client_name: String,
    pub joining_date: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_code_url: Option<String>,
}

impl From<Employee> for PublicProfile {
    fn from(e: Employee) -> Self {
        Self {
            employee_id: e.employee_id,
            full_name: e.full_name,
            gender: e.gender,
            district: e.district,
            client_name: e.client_name,
            joining_date: e.joining_date,
            status: e.status.as_str().to_string(),
            profile_picture_url: e.profile_picture_url,
            qr_code_url: e.qr_code_url,
        }
    }
}

fn profile_err(err: RepoError) -> AppError {
    match err {
        RepoError::NotFound(msg) => AppError::with_message(ErrorCode::EmployeeNotFound, msg),
        other => other.into(),
    }
}

/// Public profile lookup by record id
pub async fn get_profile(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<PublicProfile>>, AppError> {
    let employee = state
        .db
        .employees()
        .find_by_id(&id)
        .await
        .map_err(profile_err)?
        .ok_or_else(|| AppError::new(ErrorCode::EmployeeNotFound))?;

    Ok(ok(PublicProfile::from(employee)))
}

/// Self-service profile update
///
/// Employees correct their own record from the QR landing page. Runs the
/// same diff builder and invariants as the admin edit; the response stays
/// the reduced public view.
pub async fn update_profile(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(req): Json<EmployeeUpdate>,
) -> Result<Json<ApiResponse<PublicProfile>>, AppError> {
    if let Some(ifsc) = &req.ifsc_code {
        validate_ifsc(ifsc, "ifscCode")?;
    }
    validate_pan(&req.pan_number, "panNumber")?;
    if let Some(email) = &req.email_address {
        validate_email(email, "emailAddress")?;
    }

    let existing = state
        .db
        .employees()
        .find_by_id(&id)
        .await
        .map_err(profile_err)?
        .ok_or_else(|| AppError::new(ErrorCode::EmployeeNotFound))?;

    match build_update_document(&existing, &req)? {
        UpdateOutcome::Unchanged => Ok(ok_with_message(
            PublicProfile::from(existing),
            "No changes to save",
        )),
        UpdateOutcome::Changed(doc) => {
            tracing::info!(id = %id, "self-service profile update");
            let updated = state
                .db
                .employees()
                .merge(&id, doc)
                .await
                .map_err(profile_err)?;
            Ok(ok(PublicProfile::from(updated)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::extract::{Path, State};
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
            employee_id: "CISS/ABC/2024-25/007".to_string(),
            full_name: "Ravi Sharma".to_string(),
            first_name: "Ravi".to_string(),
            last_name: "Sharma".to_string(),
            gender: "Male".to_string(),
            date_of_birth: "1988-07-02".to_string(),
            father_name: "Mohan Sharma".to_string(),
            mother_name: "Sita Sharma".to_string(),
            marital_status: MaritalStatus::Single,
            spouse_name: None,
            phone_number: "9123456780".to_string(),
            email_address: "ravi@example.com".to_string(),
            district: "Kamrup".to_string(),
            full_address: "4 Lake View".to_string(),
            client_name: "ABC Industries".to_string(),
            resource_id_number: None,
            joining_date: "2024-02-01".to_string(),
            status: EmployeeStatus::Active,
            exit_date: None,
            identity_proof_type: "Aadhaar".to_string(),
            identity_proof_number: "4321 8765 2109".to_string(),
            address_proof_type: "Voter ID".to_string(),
            address_proof_number: "ABC1234567".to_string(),
            bank_name: "State Bank".to_string(),
            bank_account_number: "99887766554".to_string(),
            ifsc_code: "SBIN0004321".to_string(),
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
            searchable_fields: vec!["RAVI".into(), "SHARMA".into(), "9123456780".into()],
            created_at: "2024-02-01T09:00:00Z".to_string(),
            updated_at: "2024-02-01T09:00:00Z".to_string(),
        }
    }

    #[tokio::test]
    async fn test_self_service_update_applies_diff() {
        let (_dir, state) = test_state().await;
        let created = state.db.employees().create(sample_employee()).await.unwrap();
        let id = created.id.as_ref().unwrap().to_string();

        let req = EmployeeUpdate {
            district: Some("Jorhat".to_string()),
            ..Default::default()
        };
        let resp = update_profile(State(state.clone()), Path(id.clone()), Json(req))
            .await
            .unwrap();
        assert_eq!(resp.0.data.unwrap().district, "Jorhat");

        // Same update again is a no-op
        let req = EmployeeUpdate {
            district: Some("Jorhat".to_string()),
            ..Default::default()
        };
        let resp = update_profile(State(state), Path(id), Json(req))
            .await
            .unwrap();
        assert_eq!(resp.0.message, "No changes to save");
    }

    #[tokio::test]
    async fn test_self_service_cannot_change_phone() {
        let (_dir, state) = test_state().await;
        let created = state.db.employees().create(sample_employee()).await.unwrap();
        let id = created.id.as_ref().unwrap().to_string();

        let req = EmployeeUpdate {
            phone_number: Some("9000000000".to_string()),
            ..Default::default()
        };
        let err = update_profile(State(state), Path(id), Json(req))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PhoneImmutable);
    }

    #[tokio::test]
    async fn test_public_view_withholds_bank_details() {
        let (_dir, state) = test_state().await;
        let created = state.db.employees().create(sample_employee()).await.unwrap();
        let id = created.id.as_ref().unwrap().to_string();

        let resp = get_profile(State(state), Path(id)).await.unwrap();
        let json = serde_json::to_value(resp.0.data.unwrap()).unwrap();
        assert!(json.get("bankAccountNumber").is_none());
        assert!(json.get("identityProofNumber").is_none());
        assert_eq!(json["employeeId"], "CISS/ABC/2024-25/007");
    }
}
