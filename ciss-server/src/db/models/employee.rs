//! Employee record model
//!
//! The employee document is the core record of the registry. Two shapes exist
//! on disk:
//! - the current shape with split identity-proof fields
//! - a legacy shape with `idProofType` / `idProofNumber` / `idProofDocumentUrl`
//!
//! [`RawEmployee`] deserializes both; [`Employee::from_raw`] folds the legacy
//! fields into the current ones, so everything above the repository layer only
//! ever sees the current shape.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use surrealdb::RecordId;

use super::serde_helpers::option_record_id;
use crate::utils::AppError;
use shared::ErrorCode;

// ========== Enums ==========

/// Employment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmployeeStatus {
    Active,
    Inactive,
    OnLeave,
    Exited,
}

impl EmployeeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeStatus::Active => "Active",
            EmployeeStatus::Inactive => "Inactive",
            EmployeeStatus::OnLeave => "OnLeave",
            EmployeeStatus::Exited => "Exited",
        }
    }
}

/// Marital status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaritalStatus {
    Single,
    Married,
    Divorced,
    Widowed,
}

/// Document attachment slots on an employee record
///
/// Each slot maps to one URL field; the slot name doubles as the storage
/// category segment in the blob path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentSlot {
    ProfilePicture,
    Signature,
    BankPassbook,
    PoliceClearance,
    IdentityProofFront,
    IdentityProofBack,
    AddressProofFront,
    AddressProofBack,
}

impl DocumentSlot {
    pub const ALL: [DocumentSlot; 8] = [
        DocumentSlot::ProfilePicture,
        DocumentSlot::Signature,
        DocumentSlot::BankPassbook,
        DocumentSlot::PoliceClearance,
        DocumentSlot::IdentityProofFront,
        DocumentSlot::IdentityProofBack,
        DocumentSlot::AddressProofFront,
        DocumentSlot::AddressProofBack,
    ];

    /// Parse a slot from its URL path segment
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "profile-picture" => Some(DocumentSlot::ProfilePicture),
            "signature" => Some(DocumentSlot::Signature),
            "bank-passbook" => Some(DocumentSlot::BankPassbook),
            "police-clearance" => Some(DocumentSlot::PoliceClearance),
            "identity-proof-front" => Some(DocumentSlot::IdentityProofFront),
            "identity-proof-back" => Some(DocumentSlot::IdentityProofBack),
            "address-proof-front" => Some(DocumentSlot::AddressProofFront),
            "address-proof-back" => Some(DocumentSlot::AddressProofBack),
            _ => None,
        }
    }

    /// Storage category segment used in blob paths
    pub fn category(&self) -> &'static str {
        match self {
            DocumentSlot::ProfilePicture => "profile-picture",
            DocumentSlot::Signature => "signature",
            DocumentSlot::BankPassbook => "bank-passbook",
            DocumentSlot::PoliceClearance => "police-clearance",
            DocumentSlot::IdentityProofFront => "identity-proof-front",
            DocumentSlot::IdentityProofBack => "identity-proof-back",
            DocumentSlot::AddressProofFront => "address-proof-front",
            DocumentSlot::AddressProofBack => "address-proof-back",
        }
    }

    /// Document field name (wire/storage key) for this slot
    pub fn field_key(&self) -> &'static str {
        match self {
            DocumentSlot::ProfilePicture => "profilePictureUrl",
            DocumentSlot::Signature => "signatureUrl",
            DocumentSlot::BankPassbook => "bankPassbookStatementUrl",
            DocumentSlot::PoliceClearance => "policeClearanceCertificateUrl",
            DocumentSlot::IdentityProofFront => "identityProofFrontUrl",
            DocumentSlot::IdentityProofBack => "identityProofBackUrl",
            DocumentSlot::AddressProofFront => "addressProofFrontUrl",
            DocumentSlot::AddressProofBack => "addressProofBackUrl",
        }
    }
}

// ========== Record ==========

/// Employee record (current shape)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[serde(skip_serializing_if = "Option::is_none", with = "option_record_id")]
    #[serde(default)]
    pub id: Option<RecordId>,

    /// Human-readable registry id, e.g. `CISS/ABC/2024-25/042`
    pub employee_id: String,

    // ---- personal ----
    pub full_name: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    /// ISO date `YYYY-MM-DD`
    pub date_of_birth: String,
    pub father_name: String,
    pub mother_name: String,
    pub marital_status: MaritalStatus,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub spouse_name: Option<String>,

    // ---- contact ----
    pub phone_number: String,
    pub email_address: String,
    pub district: String,
    pub full_address: String,

    // ---- posting ----
    pub client_name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub resource_id_number: Option<String>,
    /// ISO date `YYYY-MM-DD`
    pub joining_date: String,
    pub status: EmployeeStatus,
    /// ISO date, present iff status is Exited
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub exit_date: Option<String>,

    // ---- identity & address proofs ----
    pub identity_proof_type: String,
    pub identity_proof_number: String,
    pub address_proof_type: String,
    pub address_proof_number: String,

    // ---- bank & statutory ----
    pub bank_name: String,
    pub bank_account_number: String,
    pub ifsc_code: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub pan_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub epf_uan_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub esic_number: Option<String>,

    // ---- documents ----
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub profile_picture_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub signature_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub bank_passbook_statement_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub police_clearance_certificate_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub identity_proof_front_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub identity_proof_back_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub address_proof_front_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub address_proof_back_url: Option<String>,

    // ---- derived ----
    /// Base64 PNG data URL of the identity QR code
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub qr_code_url: Option<String>,
    /// Uppercased tokens matched by whole-token containment search
    #[serde(default)]
    pub searchable_fields: Vec<String>,

    /// RFC 3339 timestamps, set server-side
    pub created_at: String,
    pub updated_at: String,
}

/// Employee record as stored, including legacy fields
///
/// Deserialize-only. Every stored field is declared directly rather than
/// flattening [`Employee`]: `#[serde(flatten)]` buffers the record through
/// serde's self-describing content model, which the database deserializer
/// rejects for enum fields. Converted to [`Employee`] at the repository
/// read boundary via [`Employee::from_raw`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEmployee {
    #[serde(with = "option_record_id", default)]
    pub id: Option<RecordId>,
    pub employee_id: String,
    pub full_name: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub date_of_birth: String,
    pub father_name: String,
    pub mother_name: String,
    pub marital_status: MaritalStatus,
    #[serde(default)]
    pub spouse_name: Option<String>,
    pub phone_number: String,
    pub email_address: String,
    pub district: String,
    pub full_address: String,
    pub client_name: String,
    #[serde(default)]
    pub resource_id_number: Option<String>,
    pub joining_date: String,
    pub status: EmployeeStatus,
    #[serde(default)]
    pub exit_date: Option<String>,
    // Proof fields default to empty so legacy records missing them still load
    #[serde(default)]
    pub identity_proof_type: String,
    #[serde(default)]
    pub identity_proof_number: String,
    #[serde(default)]
    pub address_proof_type: String,
    #[serde(default)]
    pub address_proof_number: String,
    pub bank_name: String,
    pub bank_account_number: String,
    pub ifsc_code: String,
    #[serde(default)]
    pub pan_number: Option<String>,
    #[serde(default)]
    pub epf_uan_number: Option<String>,
    #[serde(default)]
    pub esic_number: Option<String>,
    #[serde(default)]
    pub profile_picture_url: Option<String>,
    #[serde(default)]
    pub signature_url: Option<String>,
    #[serde(default)]
    pub bank_passbook_statement_url: Option<String>,
    #[serde(default)]
    pub police_clearance_certificate_url: Option<String>,
    #[serde(default)]
    pub identity_proof_front_url: Option<String>,
    #[serde(default)]
    pub identity_proof_back_url: Option<String>,
    #[serde(default)]
    pub address_proof_front_url: Option<String>,
    #[serde(default)]
    pub address_proof_back_url: Option<String>,
    #[serde(default)]
    pub qr_code_url: Option<String>,
    #[serde(default)]
    pub searchable_fields: Vec<String>,
    pub created_at: String,
    pub updated_at: String,

    // Legacy single-sided identity proof fields
    #[serde(default)]
    pub id_proof_type: Option<String>,
    #[serde(default)]
    pub id_proof_number: Option<String>,
    #[serde(default)]
    pub id_proof_document_url: Option<String>,
}

impl Employee {
    /// Normalize a stored record into the current shape
    ///
    /// Legacy `idProof*` fields fill the identity-proof fields only where
    /// those are empty; a record already in the current shape is unchanged.
    pub fn from_raw(raw: RawEmployee) -> Self {
        let RawEmployee {
            id,
            employee_id,
            full_name,
            first_name,
            last_name,
            gender,
            date_of_birth,
            father_name,
            mother_name,
            marital_status,
            spouse_name,
            phone_number,
            email_address,
            district,
            full_address,
            client_name,
            resource_id_number,
            joining_date,
            status,
            exit_date,
            mut identity_proof_type,
            mut identity_proof_number,
            address_proof_type,
            address_proof_number,
            bank_name,
            bank_account_number,
            ifsc_code,
            pan_number,
            epf_uan_number,
            esic_number,
            profile_picture_url,
            signature_url,
            bank_passbook_statement_url,
            police_clearance_certificate_url,
            mut identity_proof_front_url,
            identity_proof_back_url,
            address_proof_front_url,
            address_proof_back_url,
            qr_code_url,
            searchable_fields,
            created_at,
            updated_at,
            id_proof_type,
            id_proof_number,
            id_proof_document_url,
        } = raw;

        if identity_proof_type.is_empty() {
            if let Some(t) = id_proof_type {
                identity_proof_type = t;
            }
        }
        if identity_proof_number.is_empty() {
            if let Some(n) = id_proof_number {
                identity_proof_number = n;
            }
        }
        if identity_proof_front_url.is_none() {
            identity_proof_front_url = id_proof_document_url;
        }

        Employee {
            id,
            employee_id,
            full_name,
            first_name,
            last_name,
            gender,
            date_of_birth,
            father_name,
            mother_name,
            marital_status,
            spouse_name,
            phone_number,
            email_address,
            district,
            full_address,
            client_name,
            resource_id_number,
            joining_date,
            status,
            exit_date,
            identity_proof_type,
            identity_proof_number,
            address_proof_type,
            address_proof_number,
            bank_name,
            bank_account_number,
            ifsc_code,
            pan_number,
            epf_uan_number,
            esic_number,
            profile_picture_url,
            signature_url,
            bank_passbook_statement_url,
            police_clearance_certificate_url,
            identity_proof_front_url,
            identity_proof_back_url,
            address_proof_front_url,
            address_proof_back_url,
            qr_code_url,
            searchable_fields,
            created_at,
            updated_at,
        }
    }

    /// URL stored in the given document slot
    pub fn document_url(&self, slot: DocumentSlot) -> Option<&str> {
        let url = match slot {
            DocumentSlot::ProfilePicture => &self.profile_picture_url,
            DocumentSlot::Signature => &self.signature_url,
            DocumentSlot::BankPassbook => &self.bank_passbook_statement_url,
            DocumentSlot::PoliceClearance => &self.police_clearance_certificate_url,
            DocumentSlot::IdentityProofFront => &self.identity_proof_front_url,
            DocumentSlot::IdentityProofBack => &self.identity_proof_back_url,
            DocumentSlot::AddressProofFront => &self.address_proof_front_url,
            DocumentSlot::AddressProofBack => &self.address_proof_back_url,
        };
        url.as_deref()
    }

    /// All populated document slots with their URLs (for deletion cascade)
    pub fn document_urls(&self) -> Vec<(DocumentSlot, &str)> {
        DocumentSlot::ALL
            .iter()
            .filter_map(|slot| self.document_url(*slot).map(|url| (*slot, url)))
            .collect()
    }
}

// ========== Partial update ==========

/// Fields editable through the profile edit endpoint
///
/// Every field is optional; absent fields are left untouched. `phoneNumber`
/// is accepted for echo-back validation but must match the stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeUpdate {
    pub full_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<String>,
    pub father_name: Option<String>,
    pub mother_name: Option<String>,
    pub marital_status: Option<MaritalStatus>,
    pub spouse_name: Option<String>,
    pub phone_number: Option<String>,
    pub email_address: Option<String>,
    pub district: Option<String>,
    pub full_address: Option<String>,
    pub client_name: Option<String>,
    pub resource_id_number: Option<String>,
    pub joining_date: Option<String>,
    pub status: Option<EmployeeStatus>,
    pub exit_date: Option<String>,
    pub identity_proof_type: Option<String>,
    pub identity_proof_number: Option<String>,
    pub address_proof_type: Option<String>,
    pub address_proof_number: Option<String>,
    pub bank_name: Option<String>,
    pub bank_account_number: Option<String>,
    pub ifsc_code: Option<String>,
    pub pan_number: Option<String>,
    pub epf_uan_number: Option<String>,
    pub esic_number: Option<String>,
}

/// Outcome of computing an update document
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    /// Nothing differs from the stored record
    Unchanged,
    /// Keys to merge into the stored record (storage field names)
    Changed(Map<String, Value>),
}

/// Compute the merge document for a partial update
///
/// Only fields that actually differ from `existing` are included, so an
/// update equal to the stored record yields [`UpdateOutcome::Unchanged`]
/// and no write happens.
///
/// Enforced invariants:
/// - `phoneNumber` is immutable
/// - status `Exited` requires an exit date; any other status clears it
/// - marital status other than `Married` clears the spouse name
/// - a changed `fullName` recomputes `searchableFields`
pub fn build_update_document(
    existing: &Employee,
    update: &EmployeeUpdate,
) -> Result<UpdateOutcome, AppError> {
    if let Some(phone) = &update.phone_number {
        if phone != &existing.phone_number {
            return Err(AppError::new(ErrorCode::PhoneImmutable));
        }
    }

    let mut doc = Map::new();

    fn set_if_changed(doc: &mut Map<String, Value>, key: &str, new: &Option<String>, old: &str) {
        if let Some(new) = new {
            if new != old {
                doc.insert(key.to_string(), Value::String(new.clone()));
            }
        }
    }

    fn set_if_changed_opt(
        doc: &mut Map<String, Value>,
        key: &str,
        new: &Option<String>,
        old: &Option<String>,
    ) {
        if let Some(new) = new {
            if Some(new) != old.as_ref() {
                doc.insert(key.to_string(), Value::String(new.clone()));
            }
        }
    }

    set_if_changed(&mut doc, "fullName", &update.full_name, &existing.full_name);
    set_if_changed(
        &mut doc,
        "firstName",
        &update.first_name,
        &existing.first_name,
    );
    set_if_changed(&mut doc, "lastName", &update.last_name, &existing.last_name);
    set_if_changed(&mut doc, "gender", &update.gender, &existing.gender);
    set_if_changed(
        &mut doc,
        "dateOfBirth",
        &update.date_of_birth,
        &existing.date_of_birth,
    );
    set_if_changed(
        &mut doc,
        "fatherName",
        &update.father_name,
        &existing.father_name,
    );
    set_if_changed(
        &mut doc,
        "motherName",
        &update.mother_name,
        &existing.mother_name,
    );
    set_if_changed(
        &mut doc,
        "emailAddress",
        &update.email_address,
        &existing.email_address,
    );
    set_if_changed(&mut doc, "district", &update.district, &existing.district);
    set_if_changed(
        &mut doc,
        "fullAddress",
        &update.full_address,
        &existing.full_address,
    );
    set_if_changed(
        &mut doc,
        "clientName",
        &update.client_name,
        &existing.client_name,
    );
    set_if_changed_opt(
        &mut doc,
        "resourceIdNumber",
        &update.resource_id_number,
        &existing.resource_id_number,
    );
    set_if_changed(
        &mut doc,
        "joiningDate",
        &update.joining_date,
        &existing.joining_date,
    );
    set_if_changed(
        &mut doc,
        "identityProofType",
        &update.identity_proof_type,
        &existing.identity_proof_type,
    );
    set_if_changed(
        &mut doc,
        "identityProofNumber",
        &update.identity_proof_number,
        &existing.identity_proof_number,
    );
    set_if_changed(
        &mut doc,
        "addressProofType",
        &update.address_proof_type,
        &existing.address_proof_type,
    );
    set_if_changed(
        &mut doc,
        "addressProofNumber",
        &update.address_proof_number,
        &existing.address_proof_number,
    );
    set_if_changed(&mut doc, "bankName", &update.bank_name, &existing.bank_name);
    set_if_changed(
        &mut doc,
        "bankAccountNumber",
        &update.bank_account_number,
        &existing.bank_account_number,
    );
    set_if_changed(&mut doc, "ifscCode", &update.ifsc_code, &existing.ifsc_code);
    set_if_changed_opt(
        &mut doc,
        "panNumber",
        &update.pan_number,
        &existing.pan_number,
    );
    set_if_changed_opt(
        &mut doc,
        "epfUanNumber",
        &update.epf_uan_number,
        &existing.epf_uan_number,
    );
    set_if_changed_opt(
        &mut doc,
        "esicNumber",
        &update.esic_number,
        &existing.esic_number,
    );

    // Status transitions and the exit-date invariant
    let effective_status = update.status.unwrap_or(existing.status);
    if let Some(status) = update.status {
        if status != existing.status {
            doc.insert(
                "status".to_string(),
                serde_json::to_value(status).unwrap_or(Value::Null),
            );
        }
    }
    if effective_status == EmployeeStatus::Exited {
        let exit_date = update
            .exit_date
            .as_ref()
            .or(existing.exit_date.as_ref())
            .ok_or_else(|| AppError::new(ErrorCode::ExitDateRequired))?;
        if Some(exit_date) != existing.exit_date.as_ref() {
            doc.insert(
                "exitDate".to_string(),
                Value::String(exit_date.clone()),
            );
        }
    } else {
        if update.exit_date.is_some() {
            return Err(AppError::new(ErrorCode::ExitDateNotAllowed));
        }
        if existing.exit_date.is_some() {
            doc.insert("exitDate".to_string(), Value::Null);
        }
    }

    // Marital status and the spouse-name invariant
    let effective_marital = update.marital_status.unwrap_or(existing.marital_status);
    if let Some(marital) = update.marital_status {
        if marital != existing.marital_status {
            doc.insert(
                "maritalStatus".to_string(),
                serde_json::to_value(marital).unwrap_or(Value::Null),
            );
        }
    }
    if effective_marital == MaritalStatus::Married {
        set_if_changed_opt(
            &mut doc,
            "spouseName",
            &update.spouse_name,
            &existing.spouse_name,
        );
    } else if existing.spouse_name.is_some() {
        doc.insert("spouseName".to_string(), Value::Null);
    }

    // Name changes invalidate the search tokens
    if doc.contains_key("fullName") {
        let new_name = update.full_name.as_deref().unwrap_or(&existing.full_name);
        let tokens = crate::services::searchable::build_searchable_fields(
            new_name,
            &existing.employee_id,
            &existing.phone_number,
        );
        doc.insert(
            "searchableFields".to_string(),
            Value::Array(tokens.into_iter().map(Value::String).collect()),
        );
    }

    if doc.is_empty() {
        Ok(UpdateOutcome::Unchanged)
    } else {
        Ok(UpdateOutcome::Changed(doc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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
            marital_status: MaritalStatus::Married,
            spouse_name: Some("Alex Doe".to_string()),
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
            pan_number: Some("ABCDE1234F".to_string()),
            epf_uan_number: None,
            esic_number: None,
            profile_picture_url: Some("/api/files/employees/9876543210/profile-picture/1.jpg".to_string()),
            signature_url: None,
            bank_passbook_statement_url: None,
            police_clearance_certificate_url: None,
            identity_proof_front_url: None,
            identity_proof_back_url: None,
            address_proof_front_url: None,
            address_proof_back_url: None,
            qr_code_url: Some("data:image/png;base64,AAAA".to_string()),
            searchable_fields: vec!["JANE".into(), "DOE".into()],
            created_at: "2024-05-01T10:00:00Z".to_string(),
            updated_at: "2024-05-01T10:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_identical_update_is_unchanged() {
        let existing = sample_employee();
        let update = EmployeeUpdate {
            full_name: Some("Jane Doe".to_string()),
            district: Some("Kamrup".to_string()),
            marital_status: Some(MaritalStatus::Married),
            spouse_name: Some("Alex Doe".to_string()),
            phone_number: Some("9876543210".to_string()),
            ..Default::default()
        };
        let outcome = build_update_document(&existing, &update).unwrap();
        assert_eq!(outcome, UpdateOutcome::Unchanged);
    }

    #[test]
    fn test_phone_is_immutable() {
        let existing = sample_employee();
        let update = EmployeeUpdate {
            phone_number: Some("9999999999".to_string()),
            ..Default::default()
        };
        let err = build_update_document(&existing, &update).unwrap_err();
        assert_eq!(err.code, ErrorCode::PhoneImmutable);
    }

    #[test]
    fn test_exit_requires_exit_date() {
        let existing = sample_employee();
        let update = EmployeeUpdate {
            status: Some(EmployeeStatus::Exited),
            ..Default::default()
        };
        let err = build_update_document(&existing, &update).unwrap_err();
        assert_eq!(err.code, ErrorCode::ExitDateRequired);
    }

    #[test]
    fn test_exit_with_date_sets_both() {
        let existing = sample_employee();
        let update = EmployeeUpdate {
            status: Some(EmployeeStatus::Exited),
            exit_date: Some("2025-03-31".to_string()),
            ..Default::default()
        };
        match build_update_document(&existing, &update).unwrap() {
            UpdateOutcome::Changed(doc) => {
                assert_eq!(doc["status"], serde_json::json!("Exited"));
                assert_eq!(doc["exitDate"], serde_json::json!("2025-03-31"));
            }
            other => panic!("expected Changed, got {:?}", other),
        }
    }

    #[test]
    fn test_reactivation_clears_exit_date() {
        let mut existing = sample_employee();
        existing.status = EmployeeStatus::Exited;
        existing.exit_date = Some("2025-03-31".to_string());
        let update = EmployeeUpdate {
            status: Some(EmployeeStatus::Active),
            ..Default::default()
        };
        match build_update_document(&existing, &update).unwrap() {
            UpdateOutcome::Changed(doc) => {
                assert_eq!(doc["status"], serde_json::json!("Active"));
                assert_eq!(doc["exitDate"], Value::Null);
            }
            other => panic!("expected Changed, got {:?}", other),
        }
    }

    #[test]
    fn test_exit_date_rejected_for_active() {
        let existing = sample_employee();
        let update = EmployeeUpdate {
            exit_date: Some("2025-03-31".to_string()),
            ..Default::default()
        };
        let err = build_update_document(&existing, &update).unwrap_err();
        assert_eq!(err.code, ErrorCode::ExitDateNotAllowed);
    }

    #[test]
    fn test_single_clears_spouse_name() {
        let existing = sample_employee();
        let update = EmployeeUpdate {
            marital_status: Some(MaritalStatus::Single),
            ..Default::default()
        };
        match build_update_document(&existing, &update).unwrap() {
            UpdateOutcome::Changed(doc) => {
                assert_eq!(doc["maritalStatus"], serde_json::json!("Single"));
                assert_eq!(doc["spouseName"], Value::Null);
            }
            other => panic!("expected Changed, got {:?}", other),
        }
    }

    #[test]
    fn test_name_change_rebuilds_search_tokens() {
        let existing = sample_employee();
        let update = EmployeeUpdate {
            full_name: Some("Janet Doe".to_string()),
            ..Default::default()
        };
        match build_update_document(&existing, &update).unwrap() {
            UpdateOutcome::Changed(doc) => {
                let tokens = doc["searchableFields"].as_array().unwrap();
                assert!(tokens.contains(&serde_json::json!("JANET")));
                assert!(tokens.contains(&serde_json::json!("9876543210")));
            }
            other => panic!("expected Changed, got {:?}", other),
        }
    }

    #[test]
    fn test_legacy_record_normalization() {
        let json = serde_json::json!({
            "employeeId": "CISS/XY/2023-24/007",
            "fullName": "Old Record",
            "firstName": "Old",
            "lastName": "Record",
            "gender": "Male",
            "dateOfBirth": "1985-06-01",
            "fatherName": "F",
            "motherName": "M",
            "maritalStatus": "Single",
            "phoneNumber": "9123456780",
            "emailAddress": "old@example.com",
            "district": "Jorhat",
            "fullAddress": "Somewhere",
            "clientName": "XY Corp",
            "joiningDate": "2023-07-01",
            "status": "Active",
            "identityProofType": "",
            "identityProofNumber": "",
            "addressProofType": "Voter ID",
            "addressProofNumber": "XYZ123",
            "bankName": "B",
            "bankAccountNumber": "1",
            "ifscCode": "SBIN0000001",
            "panNumber": "ABCDE1234F",
            "idProofType": "Aadhaar",
            "idProofNumber": "9999 8888 7777",
            "idProofDocumentUrl": "/api/files/employees/9123456780/identity-proof-front/1.jpg",
            "createdAt": "2023-07-01T08:00:00Z",
            "updatedAt": "2023-07-01T08:00:00Z"
        });
        let raw: RawEmployee = serde_json::from_value(json).unwrap();
        let employee = Employee::from_raw(raw);
        assert_eq!(employee.identity_proof_type, "Aadhaar");
        assert_eq!(employee.identity_proof_number, "9999 8888 7777");
        assert_eq!(
            employee.identity_proof_front_url.as_deref(),
            Some("/api/files/employees/9123456780/identity-proof-front/1.jpg")
        );
    }

    #[test]
    fn test_current_record_unchanged_by_normalization() {
        let employee = sample_employee();
        let json = serde_json::to_value(&employee).unwrap();
        let raw: RawEmployee = serde_json::from_value(json).unwrap();
        let roundtripped = Employee::from_raw(raw);
        assert_eq!(roundtripped.identity_proof_type, "Aadhaar");
        assert_eq!(roundtripped.identity_proof_number, "1234 5678 9012");
    }

    #[test]
    fn test_document_slot_slugs() {
        assert_eq!(
            DocumentSlot::from_slug("bank-passbook"),
            Some(DocumentSlot::BankPassbook)
        );
        assert_eq!(DocumentSlot::from_slug("passport"), None);
        for slot in DocumentSlot::ALL {
            assert_eq!(DocumentSlot::from_slug(slot.category()), Some(slot));
        }
    }

    #[test]
    fn test_document_urls_collects_populated_slots() {
        let employee = sample_employee();
        let urls = employee.document_urls();
        assert_eq!(urls.len(), 1);
        assert_eq!(urls[0].0, DocumentSlot::ProfilePicture);
    }
}
