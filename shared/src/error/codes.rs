//! Unified error codes for the guard registry
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 8xxx: Employee / enrollment errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Account is disabled
    AccountDisabled = 1005,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2002,

    // ==================== 8xxx: Employee / Enrollment ====================
    /// Employee not found
    EmployeeNotFound = 8001,
    /// An employee with this phone number already exists
    EmployeePhoneExists = 8002,
    /// Phone number cannot be changed after enrollment
    PhoneImmutable = 8003,
    /// Exit date is required when status is Exited
    ExitDateRequired = 8004,
    /// Exit date is only allowed when status is Exited
    ExitDateNotAllowed = 8005,
    /// Document verification reported a mismatch
    DocumentVerificationFailed = 8006,
    /// A required document upload failed
    DocumentUploadFailed = 8007,
    /// Uploaded document exceeds the size limit
    DocumentTooLarge = 8008,
    /// Uploaded document has an unsupported type
    UnsupportedDocumentType = 8009,
    /// Unknown document slot
    UnknownDocumentSlot = 8010,
    /// Client not found
    ClientNotFound = 8101,
    /// A client with this name already exists
    ClientNameExists = 8102,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9003,
    /// Network error (transient)
    NetworkError = 9004,
    /// Blob storage error
    StorageError = 9005,
    /// PDF rendering failed
    PdfRenderFailed = 9006,
    /// QR code encoding failed
    QrEncodeFailed = 9007,
}

impl ErrorCode {
    /// Get the numeric value of this error code
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the default human-readable message for this error code
    pub fn message(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Unknown => "Unknown error",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::InvalidRequest => "Invalid request",
            Self::InvalidFormat => "Invalid format",
            Self::RequiredField => "Required field missing",

            Self::NotAuthenticated => "Please login first",
            Self::InvalidCredentials => "Invalid username or password",
            Self::TokenExpired => "Token expired",
            Self::TokenInvalid => "Invalid token",
            Self::AccountDisabled => "Account has been disabled",

            Self::PermissionDenied => "Permission denied",
            Self::AdminRequired => "Admin role required",

            Self::EmployeeNotFound => "Employee not found",
            Self::EmployeePhoneExists => "An employee with this phone number already exists",
            Self::PhoneImmutable => "Phone number cannot be changed after enrollment",
            Self::ExitDateRequired => "Exit date is required when status is Exited",
            Self::ExitDateNotAllowed => "Exit date is only allowed when status is Exited",
            Self::DocumentVerificationFailed => "Document verification failed",
            Self::DocumentUploadFailed => "Document upload failed",
            Self::DocumentTooLarge => "Document exceeds the maximum file size",
            Self::UnsupportedDocumentType => "Unsupported document type",
            Self::UnknownDocumentSlot => "Unknown document slot",
            Self::ClientNotFound => "Client not found",
            Self::ClientNameExists => "A client with this name already exists",

            Self::InternalError => "Internal server error",
            Self::DatabaseError => "Database error",
            Self::ConfigError => "Configuration error",
            Self::NetworkError => "Network error",
            Self::StorageError => "Blob storage error",
            Self::PdfRenderFailed => "PDF rendering failed",
            Self::QrEncodeFailed => "QR code encoding failed",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message(), self.code())
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 into an [`ErrorCode`]
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid error code: {0}")]
pub struct InvalidErrorCode(pub u16);

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let code = match value {
            0 => Self::Success,
            1 => Self::Unknown,
            2 => Self::ValidationFailed,
            3 => Self::NotFound,
            4 => Self::AlreadyExists,
            5 => Self::InvalidRequest,
            6 => Self::InvalidFormat,
            7 => Self::RequiredField,

            1001 => Self::NotAuthenticated,
            1002 => Self::InvalidCredentials,
            1003 => Self::TokenExpired,
            1004 => Self::TokenInvalid,
            1005 => Self::AccountDisabled,

            2001 => Self::PermissionDenied,
            2002 => Self::AdminRequired,

            8001 => Self::EmployeeNotFound,
            8002 => Self::EmployeePhoneExists,
            8003 => Self::PhoneImmutable,
            8004 => Self::ExitDateRequired,
            8005 => Self::ExitDateNotAllowed,
            8006 => Self::DocumentVerificationFailed,
            8007 => Self::DocumentUploadFailed,
            8008 => Self::DocumentTooLarge,
            8009 => Self::UnsupportedDocumentType,
            8010 => Self::UnknownDocumentSlot,
            8101 => Self::ClientNotFound,
            8102 => Self::ClientNameExists,

            9001 => Self::InternalError,
            9002 => Self::DatabaseError,
            9003 => Self::ConfigError,
            9004 => Self::NetworkError,
            9005 => Self::StorageError,
            9006 => Self::PdfRenderFailed,
            9007 => Self::QrEncodeFailed,

            other => return Err(InvalidErrorCode(other)),
        };
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::EmployeeNotFound.code(), 8001);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_round_trip() {
        for code in [
            ErrorCode::Success,
            ErrorCode::ValidationFailed,
            ErrorCode::InvalidCredentials,
            ErrorCode::AdminRequired,
            ErrorCode::DocumentVerificationFailed,
            ErrorCode::ClientNameExists,
            ErrorCode::QrEncodeFailed,
        ] {
            let value: u16 = code.into();
            assert_eq!(ErrorCode::try_from(value).unwrap(), code);
        }
    }

    #[test]
    fn test_invalid_code() {
        assert!(ErrorCode::try_from(4242).is_err());
    }

    #[test]
    fn test_serde_as_u16() {
        let json = serde_json::to_string(&ErrorCode::EmployeeNotFound).unwrap();
        assert_eq!(json, "8001");
        let code: ErrorCode = serde_json::from_str("8001").unwrap();
        assert_eq!(code, ErrorCode::EmployeeNotFound);
    }
}
