//! Input validation helpers
//!
//! Centralized text length constants and field format validators.
//! Formats follow the enrollment form rules:
//! - phone numbers are exactly 10 digits
//! - IFSC codes are exactly 11 characters
//! - PAN follows the AAAAA9999A layout

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Person and client names
pub const MAX_NAME_LEN: usize = 200;

/// Short identifiers: proof numbers, bank account, ESIC, UAN, etc.
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// Addresses
pub const MAX_ADDRESS_LEN: usize = 500;

/// IFSC codes are exactly 11 characters
pub const IFSC_LEN: usize = 11;

/// Indian mobile numbers are exactly 10 digits
pub const PHONE_LEN: usize = 10;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate a 10-digit phone number.
pub fn validate_phone(value: &str, field: &str) -> Result<(), AppError> {
    if value.len() != PHONE_LEN || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::validation(format!(
            "{field} must be exactly {PHONE_LEN} digits"
        )));
    }
    Ok(())
}

/// Validate an 11-character IFSC code.
pub fn validate_ifsc(value: &str, field: &str) -> Result<(), AppError> {
    if value.len() != IFSC_LEN || !value.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(AppError::validation(format!(
            "{field} must be exactly {IFSC_LEN} alphanumeric characters"
        )));
    }
    Ok(())
}

/// Validate an optional PAN (AAAAA9999A).
pub fn validate_pan(value: &Option<String>, field: &str) -> Result<(), AppError> {
    let Some(pan) = value else { return Ok(()) };
    let chars: Vec<char> = pan.chars().collect();
    let valid = chars.len() == 10
        && chars[..5].iter().all(|c| c.is_ascii_uppercase())
        && chars[5..9].iter().all(|c| c.is_ascii_digit())
        && chars[9].is_ascii_uppercase();
    if !valid {
        return Err(AppError::validation(format!(
            "{field} must match the PAN format (e.g. ABCDE1234F)"
        )));
    }
    Ok(())
}

/// Minimal email shape check: one '@' with a dot somewhere after it.
pub fn validate_email(value: &str, field: &str) -> Result<(), AppError> {
    if value.len() > MAX_EMAIL_LEN {
        return Err(AppError::validation(format!("{field} is too long")));
    }
    let valid = match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.'),
        None => false,
    };
    if !valid {
        return Err(AppError::validation(format!(
            "{field} is not a valid email address"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Jane", "name", MAX_NAME_LEN).is_ok());
        assert!(validate_required_text("  ", "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text(&"x".repeat(300), "name", MAX_NAME_LEN).is_err());
    }

    #[test]
    fn test_phone() {
        assert!(validate_phone("9876543210", "phoneNumber").is_ok());
        assert!(validate_phone("98765", "phoneNumber").is_err());
        assert!(validate_phone("98765432100", "phoneNumber").is_err());
        assert!(validate_phone("987654321a", "phoneNumber").is_err());
    }

    #[test]
    fn test_ifsc() {
        assert!(validate_ifsc("SBIN0001234", "ifscCode").is_ok());
        assert!(validate_ifsc("SBIN000123", "ifscCode").is_err());
        assert!(validate_ifsc("SBIN-001234", "ifscCode").is_err());
    }

    #[test]
    fn test_pan() {
        assert!(validate_pan(&None, "panNumber").is_ok());
        assert!(validate_pan(&Some("ABCDE1234F".into()), "panNumber").is_ok());
        assert!(validate_pan(&Some("abcde1234f".into()), "panNumber").is_err());
        assert!(validate_pan(&Some("ABCDE12345".into()), "panNumber").is_err());
        assert!(validate_pan(&Some("ABCD1234F".into()), "panNumber").is_err());
    }

    #[test]
    fn test_email() {
        assert!(validate_email("a@b.com", "emailAddress").is_ok());
        assert!(validate_email("not-an-email", "emailAddress").is_err());
        assert!(validate_email("@b.com", "emailAddress").is_err());
        assert!(validate_email("a@nodot", "emailAddress").is_err());
    }
}
