//! Profile kit rendering
//!
//! Assembles the downloadable three-page PDF for one employee: a biodata
//! sheet, the identity QR page and the signed terms page. Rendering is pure;
//! the handler loads the photo/signature blobs and passes them in.

use std::io::BufWriter;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::DynamicImage;
use printpdf::{
    BuiltinFont, ColorBits, ColorSpace, Image, ImageTransform, ImageXObject, IndirectFontRef, Mm,
    PdfDocument, PdfLayerReference, Px,
};
use shared::ErrorCode;

use crate::db::models::Employee;
use crate::utils::AppError;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 20.0;
const IMAGE_DPI: f32 = 300.0;

const TERMS: &[&str] = &[
    "1. The employee shall perform security duties at the client site assigned by",
    "   CISS and follow all lawful instructions of the site supervisor.",
    "2. The employee shall report for duty in the prescribed uniform and carry the",
    "   identity card bearing the employee ID printed in this kit at all times.",
    "3. Absence without prior intimation, or abandonment of post, is treated as a",
    "   disciplinary offence.",
    "4. The employee consents to the verification of the documents submitted at",
    "   enrollment and understands that falsified documents void this engagement.",
    "5. Either party may terminate the engagement with notice as per the terms of",
    "   the appointment; the exit date is recorded against the employee ID above.",
];

/// Decoded images placed into the kit
#[derive(Default)]
pub struct KitImages {
    pub photo: Option<DynamicImage>,
    pub signature: Option<DynamicImage>,
    pub qr: Option<DynamicImage>,
}

/// Decode a `data:image/png;base64,...` URL into an image
pub fn decode_data_url_image(url: &str) -> Result<DynamicImage, AppError> {
    let b64 = url
        .split_once(";base64,")
        .map(|(_, rest)| rest)
        .ok_or_else(|| AppError::validation("Not a base64 data URL"))?;
    let bytes = BASE64
        .decode(b64)
        .map_err(|e| AppError::validation(format!("Invalid data URL: {e}")))?;
    image::load_from_memory(&bytes)
        .map_err(|e| AppError::validation(format!("Invalid image data: {e}")))
}

/// Render the profile kit PDF
pub fn render_profile_kit(employee: &Employee, images: &KitImages) -> Result<Vec<u8>, AppError> {
    let (doc, page1, layer1) = PdfDocument::new(
        format!("{} - Profile Kit", employee.full_name),
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(pdf_err)?;
    let font_bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(pdf_err)?;

    // ---- page 1: biodata ----
    let layer = doc.get_page(page1).get_layer(layer1);
    page_header(&layer, &font_bold, "EMPLOYEE BIODATA");

    if let Some(photo) = &images.photo {
        place_image(&layer, photo, PAGE_WIDTH_MM - MARGIN_MM - 35.0, 235.0, 35.0);
    }

    let rows: Vec<(&str, String)> = vec![
        ("Employee ID", employee.employee_id.clone()),
        ("Full Name", employee.full_name.clone()),
        ("Gender", employee.gender.clone()),
        ("Date of Birth", employee.date_of_birth.clone()),
        ("Father's Name", employee.father_name.clone()),
        ("Mother's Name", employee.mother_name.clone()),
        (
            "Marital Status",
            format!("{:?}", employee.marital_status),
        ),
        (
            "Spouse Name",
            employee.spouse_name.clone().unwrap_or_else(|| "-".into()),
        ),
        ("Phone Number", employee.phone_number.clone()),
        ("Email Address", employee.email_address.clone()),
        ("District", employee.district.clone()),
        ("Address", employee.full_address.clone()),
        ("Client", employee.client_name.clone()),
        ("Joining Date", employee.joining_date.clone()),
        ("Status", employee.status.as_str().to_string()),
        (
            "Identity Proof",
            format!(
                "{} ({})",
                employee.identity_proof_type, employee.identity_proof_number
            ),
        ),
        (
            "Address Proof",
            format!(
                "{} ({})",
                employee.address_proof_type, employee.address_proof_number
            ),
        ),
        ("Bank Name", employee.bank_name.clone()),
        ("Account Number", employee.bank_account_number.clone()),
        ("IFSC Code", employee.ifsc_code.clone()),
        (
            "PAN Number",
            employee.pan_number.clone().unwrap_or_else(|| "-".into()),
        ),
    ];

    let mut y = 245.0;
    for (label, value) in rows {
        layer.use_text(label, 10.0, Mm(MARGIN_MM), Mm(y), &font_bold);
        layer.use_text(value, 10.0, Mm(MARGIN_MM + 50.0), Mm(y), &font);
        y -= 9.0;
    }

    // ---- page 2: identity QR ----
    let (page2, layer2) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
    let layer = doc.get_page(page2).get_layer(layer2);
    page_header(&layer, &font_bold, "IDENTITY QR CODE");

    if let Some(qr) = &images.qr {
        let size = 90.0;
        place_image(&layer, qr, (PAGE_WIDTH_MM - size) / 2.0, 140.0, size);
    }

    let center_lines = [
        employee.employee_id.clone(),
        employee.full_name.clone(),
        employee.phone_number.clone(),
    ];
    let mut y = 120.0;
    for line in center_lines {
        layer.use_text(line, 12.0, Mm(MARGIN_MM), Mm(y), &font);
        y -= 8.0;
    }

    // ---- page 3: terms and signature ----
    let (page3, layer3) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
    let layer = doc.get_page(page3).get_layer(layer3);
    page_header(&layer, &font_bold, "TERMS AND CONDITIONS");

    let mut y = 245.0;
    for line in TERMS {
        layer.use_text(*line, 10.0, Mm(MARGIN_MM), Mm(y), &font);
        y -= 7.0;
    }

    if let Some(signature) = &images.signature {
        place_image(&layer, signature, MARGIN_MM, 50.0, 45.0);
    }
    layer.use_text(
        format!("Signature of {}", employee.full_name),
        10.0,
        Mm(MARGIN_MM),
        Mm(42.0),
        &font,
    );

    let mut bytes = Vec::new();
    doc.save(&mut BufWriter::new(&mut bytes)).map_err(pdf_err)?;
    Ok(bytes)
}

fn pdf_err<E: std::fmt::Display>(e: E) -> AppError {
    AppError::with_message(ErrorCode::PdfRenderFailed, format!("PDF rendering failed: {e}"))
}

fn page_header(layer: &PdfLayerReference, font_bold: &IndirectFontRef, subtitle: &str) {
    layer.use_text(
        "CISS SECURITY SERVICES",
        18.0,
        Mm(MARGIN_MM),
        Mm(PAGE_HEIGHT_MM - 22.0),
        font_bold,
    );
    layer.use_text(
        subtitle,
        13.0,
        Mm(MARGIN_MM),
        Mm(PAGE_HEIGHT_MM - 32.0),
        font_bold,
    );
}

/// Embed an image at `(x, y)` scaled to `target_width_mm`, keeping aspect
fn place_image(layer: &PdfLayerReference, img: &DynamicImage, x: f32, y: f32, target_width_mm: f32) {
    let rgb = img.to_rgb8();
    let (w, h) = rgb.dimensions();

    let xobject = ImageXObject {
        width: Px(w as usize),
        height: Px(h as usize),
        color_space: ColorSpace::Rgb,
        bits_per_component: ColorBits::Bit8,
        interpolate: true,
        image_data: rgb.into_raw(),
        image_filter: None,
        clipping_bbox: None,
        smask: None,
    };

    // At `IMAGE_DPI`, natural width in mm is px * 25.4 / dpi; scale to target
    let natural_width_mm = w as f32 * 25.4 / IMAGE_DPI;
    let scale = target_width_mm / natural_width_mm;

    Image::from(xobject).add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(x)),
            translate_y: Some(Mm(y)),
            scale_x: Some(scale),
            scale_y: Some(scale),
            dpi: Some(IMAGE_DPI),
            ..Default::default()
        },
    );
}
