//! Enrollment Handler
//!
//! One multipart request creates a complete employee record. The pipeline
//! is strictly ordered; each stage only starts once its predecessor
//! succeeded and a failing stage aborts the rest:
//!
//! 1. parse and validate the form fields
//! 2. validate every attached document (size/type) before any network work
//! 3. AI-verify the identity and address proofs
//! 4. generate the registry id, QR code and search tokens
//! 5. upload the documents one by one
//! 6. insert the record
//!
//! A failure after stage 5 leaves already-uploaded blobs behind; they are
//! logged, not rolled back.

use std::collections::HashMap;

use axum::Json;
use axum::extract::{Multipart, State};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Map, Value};
use shared::ErrorCode;

use crate::core::ServerState;
use crate::db::models::{DocumentSlot, Employee, EmployeeStatus, MaritalStatus};
use crate::db::repository::RepoError;
use crate::services::{BlobStore, employee_id, qr, searchable};
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_email, validate_ifsc,
    validate_pan, validate_phone, validate_required_text,
};
use crate::utils::{ApiResponse, AppError, ok_with_message};

/// Document slots that must be present on every enrollment
///
/// Everything except the police-clearance certificate, including both
/// sides of each proof.
const REQUIRED_SLOTS: [DocumentSlot; 7] = [
    DocumentSlot::ProfilePicture,
    DocumentSlot::Signature,
    DocumentSlot::IdentityProofFront,
    DocumentSlot::IdentityProofBack,
    DocumentSlot::AddressProofFront,
    DocumentSlot::AddressProofBack,
    DocumentSlot::BankPassbook,
];

/// Text fields of the enrollment form
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EnrollmentForm {
    first_name: String,
    last_name: String,
    gender: String,
    date_of_birth: String,
    father_name: String,
    mother_name: String,
    marital_status: MaritalStatus,
    #[serde(default)]
    spouse_name: Option<String>,
    phone_number: String,
    email_address: String,
    district: String,
    full_address: String,
    client_name: String,
    #[serde(default)]
    resource_id_number: Option<String>,
    joining_date: String,
    identity_proof_type: String,
    identity_proof_number: String,
    address_proof_type: String,
    address_proof_number: String,
    bank_name: String,
    bank_account_number: String,
    ifsc_code: String,
    #[serde(default)]
    pan_number: Option<String>,
    #[serde(default)]
    epf_uan_number: Option<String>,
    #[serde(default)]
    esic_number: Option<String>,
}

struct UploadedFile {
    data: Vec<u8>,
    content_type: String,
}

/// Enroll a new employee
pub async fn enroll(
    State(state): State<ServerState>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<Employee>>, AppError> {
    // ---- stage 1: parse and validate fields ----
    let (form, files) = parse_multipart(multipart).await?;
    validate_form(&form)?;

    let client = state
        .db
        .clients()
        .find_by_name(&form.client_name)
        .await?
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::ClientNotFound,
                format!("Unknown client '{}'", form.client_name),
            )
        })?;

    if client.requires_resource_id
        && form
            .resource_id_number
            .as_deref()
            .is_none_or(|v| v.trim().is_empty())
    {
        return Err(AppError::with_message(
            ErrorCode::RequiredField,
            format!("resourceIdNumber is required for client '{}'", client.name),
        ));
    }

    if state
        .db
        .employees()
        .find_by_phone(&form.phone_number)
        .await?
        .is_some()
    {
        return Err(AppError::with_message(
            ErrorCode::EmployeePhoneExists,
            format!(
                "An employee with phone number {} is already enrolled",
                form.phone_number
            ),
        ));
    }

    // ---- stage 2: all documents present and within limits ----
    check_required_documents(&files)?;
    for (slot, file) in &files {
        BlobStore::validate(&file.data, &file.content_type).map_err(|e| {
            AppError::with_message(e.code, format!("{}: {}", slot.category(), e.message))
        })?;
    }

    // ---- stage 3: AI verification of the proof documents ----
    let checks = [
        (DocumentSlot::IdentityProofFront, &form.identity_proof_type),
        (DocumentSlot::AddressProofFront, &form.address_proof_type),
    ];
    for (slot, expected_type) in checks {
        // PDFs pass through unverified; the endpoint only scores images
        if let Some(file) = files.get(&slot)
            && file.content_type.starts_with("image/")
        {
            state
                .verifier
                .verify(&file.data, &file.content_type, expected_type)
                .await?;
        }
    }

    // ---- stage 4: derived fields ----
    let full_name = format!("{} {}", form.first_name.trim(), form.last_name.trim());
    let registry_id = employee_id::generate_employee_id(&form.client_name);
    let qr_code_url = qr::generate_qr_data_url(&registry_id, &full_name, &form.phone_number)?;
    let searchable_fields =
        searchable::build_searchable_fields(&full_name, &registry_id, &form.phone_number);

    // ---- stage 5: sequential uploads, first failure aborts ----
    let mut urls: HashMap<DocumentSlot, String> = HashMap::new();
    for slot in DocumentSlot::ALL {
        let Some(file) = files.get(&slot) else { continue };
        match state.storage.store(
            &form.phone_number,
            slot.category(),
            &file.data,
            &file.content_type,
        ) {
            Ok(url) => {
                urls.insert(slot, url);
            }
            Err(e) => {
                tracing::warn!(
                    phone = %form.phone_number,
                    slot = slot.category(),
                    uploaded = urls.len(),
                    error = %e,
                    "enrollment upload failed, earlier uploads are orphaned"
                );
                return Err(AppError::with_message(
                    ErrorCode::DocumentUploadFailed,
                    format!("Failed to upload '{}': {}", slot.category(), e.message),
                ));
            }
        }
    }

    // ---- stage 6: insert the record ----
    let now = Utc::now().to_rfc3339();
    let spouse_name = if form.marital_status == MaritalStatus::Married {
        form.spouse_name.clone()
    } else {
        None
    };

    let employee = Employee {
        id: None,
        employee_id: registry_id,
        full_name,
        first_name: form.first_name.trim().to_string(),
        last_name: form.last_name.trim().to_string(),
        gender: form.gender,
        date_of_birth: form.date_of_birth,
        father_name: form.father_name,
        mother_name: form.mother_name,
        marital_status: form.marital_status,
        spouse_name,
        phone_number: form.phone_number,
        email_address: form.email_address,
        district: form.district,
        full_address: form.full_address,
        client_name: form.client_name,
        resource_id_number: form.resource_id_number,
        joining_date: form.joining_date,
        status: EmployeeStatus::Active,
        exit_date: None,
        identity_proof_type: form.identity_proof_type,
        identity_proof_number: form.identity_proof_number,
        address_proof_type: form.address_proof_type,
        address_proof_number: form.address_proof_number,
        bank_name: form.bank_name,
        bank_account_number: form.bank_account_number,
        ifsc_code: form.ifsc_code,
        pan_number: form.pan_number,
        epf_uan_number: form.epf_uan_number,
        esic_number: form.esic_number,
        profile_picture_url: urls.remove(&DocumentSlot::ProfilePicture),
        signature_url: urls.remove(&DocumentSlot::Signature),
        bank_passbook_statement_url: urls.remove(&DocumentSlot::BankPassbook),
        police_clearance_certificate_url: urls.remove(&DocumentSlot::PoliceClearance),
        identity_proof_front_url: urls.remove(&DocumentSlot::IdentityProofFront),
        identity_proof_back_url: urls.remove(&DocumentSlot::IdentityProofBack),
        address_proof_front_url: urls.remove(&DocumentSlot::AddressProofFront),
        address_proof_back_url: urls.remove(&DocumentSlot::AddressProofBack),
        qr_code_url: Some(qr_code_url),
        searchable_fields,
        created_at: now.clone(),
        updated_at: now,
    };

    let created = state.db.employees().create(employee).await.map_err(|e| match e {
        RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::EmployeePhoneExists, msg),
        other => other.into(),
    })?;

    tracing::info!(
        employee_id = %created.employee_id,
        client = %created.client_name,
        "employee enrolled"
    );

    Ok(ok_with_message(created, "Enrollment successful"))
}

/// Split the multipart body into form fields and document files
///
/// File parts are named by their slot slug (`profile-picture`, ...);
/// everything else is treated as a text field.
async fn parse_multipart(
    mut multipart: Multipart,
) -> Result<(EnrollmentForm, HashMap<DocumentSlot, UploadedFile>), AppError> {
    let mut texts: Map<String, Value> = Map::new();
    let mut files: HashMap<DocumentSlot, UploadedFile> = HashMap::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Invalid multipart request: {}", e)))?
    {
        let Some(name) = field.name().map(|s| s.to_string()) else {
            continue;
        };

        if let Some(slot) = DocumentSlot::from_slug(&name) {
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::validation(format!("Multipart error: {}", e)))?
                .to_vec();
            files.insert(slot, UploadedFile { data, content_type });
        } else {
            let text = field
                .text()
                .await
                .map_err(|e| AppError::validation(format!("Multipart error: {}", e)))?;
            if !text.is_empty() {
                texts.insert(name, Value::String(text));
            }
        }
    }

    let form: EnrollmentForm = serde_json::from_value(Value::Object(texts))
        .map_err(|e| AppError::validation(format!("Invalid enrollment form: {}", e)))?;

    Ok((form, files))
}

/// Every required slot must carry an upload
fn check_required_documents(
    files: &HashMap<DocumentSlot, UploadedFile>,
) -> Result<(), AppError> {
    for slot in REQUIRED_SLOTS {
        if !files.contains_key(&slot) {
            return Err(AppError::with_message(
                ErrorCode::RequiredField,
                format!("Document '{}' is required", slot.category()),
            ));
        }
    }
    Ok(())
}

fn validate_form(form: &EnrollmentForm) -> Result<(), AppError> {
    validate_required_text(&form.first_name, "firstName", MAX_NAME_LEN)?;
    validate_required_text(&form.last_name, "lastName", MAX_NAME_LEN)?;
    validate_required_text(&form.gender, "gender", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&form.date_of_birth, "dateOfBirth", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&form.father_name, "fatherName", MAX_NAME_LEN)?;
    validate_required_text(&form.mother_name, "motherName", MAX_NAME_LEN)?;
    validate_required_text(&form.district, "district", MAX_NAME_LEN)?;
    validate_required_text(&form.full_address, "fullAddress", MAX_ADDRESS_LEN)?;
    validate_required_text(&form.client_name, "clientName", MAX_NAME_LEN)?;
    validate_required_text(&form.joining_date, "joiningDate", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(
        &form.identity_proof_type,
        "identityProofType",
        MAX_SHORT_TEXT_LEN,
    )?;
    validate_required_text(
        &form.identity_proof_number,
        "identityProofNumber",
        MAX_SHORT_TEXT_LEN,
    )?;
    validate_required_text(
        &form.address_proof_type,
        "addressProofType",
        MAX_SHORT_TEXT_LEN,
    )?;
    validate_required_text(
        &form.address_proof_number,
        "addressProofNumber",
        MAX_SHORT_TEXT_LEN,
    )?;
    validate_required_text(&form.bank_name, "bankName", MAX_NAME_LEN)?;
    validate_required_text(
        &form.bank_account_number,
        "bankAccountNumber",
        MAX_SHORT_TEXT_LEN,
    )?;

    validate_phone(&form.phone_number, "phoneNumber")?;
    validate_email(&form.email_address, "emailAddress")?;
    validate_ifsc(&form.ifsc_code, "ifscCode")?;
    validate_pan(&form.pan_number, "panNumber")?;

    match form.marital_status {
        MaritalStatus::Married => {
            if form
                .spouse_name
                .as_deref()
                .is_none_or(|v| v.trim().is_empty())
            {
                return Err(AppError::with_message(
                    ErrorCode::RequiredField,
                    "spouseName is required when married",
                ));
            }
        }
        _ => {
            if form.spouse_name.is_some() {
                return Err(AppError::validation(
                    "spouseName is only accepted when married",
                ));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> EnrollmentForm {
        EnrollmentForm {
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
        }
    }

    #[test]
    fn test_valid_form_passes() {
        assert!(validate_form(&valid_form()).is_ok());
    }

    #[test]
    fn test_married_requires_spouse_name() {
        let mut form = valid_form();
        form.marital_status = MaritalStatus::Married;
        let err = validate_form(&form).unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);

        form.spouse_name = Some("Alex Doe".to_string());
        assert!(validate_form(&form).is_ok());
    }

    #[test]
    fn test_spouse_name_rejected_when_single() {
        let mut form = valid_form();
        form.spouse_name = Some("Alex Doe".to_string());
        assert!(validate_form(&form).is_err());
    }

    #[test]
    fn test_bad_phone_rejected() {
        let mut form = valid_form();
        form.phone_number = "12345".to_string();
        assert!(validate_form(&form).is_err());
    }

    #[test]
    fn test_form_deserializes_from_field_map() {
        let mut texts = Map::new();
        for (k, v) in [
            ("firstName", "Jane"),
            ("lastName", "Doe"),
            ("gender", "Female"),
            ("dateOfBirth", "1990-01-15"),
            ("fatherName", "John"),
            ("motherName", "Mary"),
            ("maritalStatus", "Single"),
            ("phoneNumber", "9876543210"),
            ("emailAddress", "jane@example.com"),
            ("district", "Kamrup"),
            ("fullAddress", "12 Station Road"),
            ("clientName", "ABC Industries"),
            ("joiningDate", "2024-05-01"),
            ("identityProofType", "Aadhaar"),
            ("identityProofNumber", "1"),
            ("addressProofType", "Aadhaar"),
            ("addressProofNumber", "1"),
            ("bankName", "State Bank"),
            ("bankAccountNumber", "1"),
            ("ifscCode", "SBIN0001234"),
        ] {
            texts.insert(k.to_string(), Value::String(v.to_string()));
        }
        let form: EnrollmentForm = serde_json::from_value(Value::Object(texts)).unwrap();
        assert_eq!(form.first_name, "Jane");
        assert_eq!(form.marital_status, MaritalStatus::Single);
        assert!(form.pan_number.is_none());
    }

    #[test]
    fn test_missing_required_field_fails_deserialization() {
        let texts = Map::new();
        assert!(serde_json::from_value::<EnrollmentForm>(Value::Object(texts)).is_err());
    }

    fn all_required_files() -> HashMap<DocumentSlot, UploadedFile> {
        REQUIRED_SLOTS
            .into_iter()
            .map(|slot| {
                (
                    slot,
                    UploadedFile {
                        data: vec![0u8; 16],
                        content_type: "image/jpeg".to_string(),
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_all_documents_except_police_clearance_are_required() {
        // Complete set passes; police clearance stays optional
        assert!(check_required_documents(&all_required_files()).is_ok());
        assert!(!REQUIRED_SLOTS.contains(&DocumentSlot::PoliceClearance));

        // Dropping any single required slot fails, back sides included
        for missing in REQUIRED_SLOTS {
            let mut files = all_required_files();
            files.remove(&missing);
            let err = check_required_documents(&files).unwrap_err();
            assert_eq!(err.code, ErrorCode::RequiredField, "slot {:?}", missing);
        }
    }

    #[test]
    fn test_proof_back_sides_are_required() {
        assert!(REQUIRED_SLOTS.contains(&DocumentSlot::IdentityProofBack));
        assert!(REQUIRED_SLOTS.contains(&DocumentSlot::AddressProofBack));
    }
}
