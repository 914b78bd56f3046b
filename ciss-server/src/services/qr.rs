//! Identity QR generation
//!
//! Encodes the registry id, name and phone into a PNG QR code returned as a
//! base64 data URL, stored directly on the employee record.

use std::io::Cursor;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::{ImageFormat, Luma};
use qrcode::{EcLevel, QrCode};
use shared::ErrorCode;

use crate::utils::AppError;

const MIN_QR_DIMENSION: u32 = 360;

/// Plaintext payload encoded into the QR code
pub fn qr_payload(employee_id: &str, full_name: &str, phone: &str) -> String {
    format!(
        "Employee ID: {}\nName: {}\nPhone: {}",
        employee_id, full_name, phone
    )
}

/// Render the identity QR code as a `data:image/png;base64,...` URL
pub fn generate_qr_data_url(
    employee_id: &str,
    full_name: &str,
    phone: &str,
) -> Result<String, AppError> {
    let payload = qr_payload(employee_id, full_name, phone);

    let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::H).map_err(
        |e| AppError::with_message(ErrorCode::QrEncodeFailed, format!("QR encoding failed: {e}")),
    )?;

    let image = code
        .render::<Luma<u8>>()
        .min_dimensions(MIN_QR_DIMENSION, MIN_QR_DIMENSION)
        .build();

    let mut png = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| {
            AppError::with_message(ErrorCode::QrEncodeFailed, format!("QR render failed: {e}"))
        })?;

    Ok(format!("data:image/png;base64,{}", BASE64.encode(&png)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_format() {
        let payload = qr_payload("CISS/AI/2024-25/042", "Jane Doe", "9876543210");
        assert_eq!(
            payload,
            "Employee ID: CISS/AI/2024-25/042\nName: Jane Doe\nPhone: 9876543210"
        );
    }

    #[test]
    fn test_data_url_is_decodable_png() {
        let url = generate_qr_data_url("CISS/AI/2024-25/042", "Jane Doe", "9876543210").unwrap();
        let b64 = url.strip_prefix("data:image/png;base64,").unwrap();
        let png = BASE64.decode(b64).unwrap();
        let decoded = image::load_from_memory(&png).unwrap();
        assert!(decoded.width() >= MIN_QR_DIMENSION);
        assert!(decoded.height() >= MIN_QR_DIMENSION);
    }
}
