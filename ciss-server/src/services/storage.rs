//! Blob storage
//!
//! Local-disk document store under `{work_dir}/uploads`, served back through
//! `/api/files/{path}`. Images are re-encoded to JPEG; PDFs are stored
//! verbatim. Paths are deterministic:
//! `employees/{phone}/{category}/{timestamp}_{suffix}.{ext}`.

use std::fs;
use std::io::Cursor;
use std::path::{Component, Path, PathBuf};

use chrono::Utc;
use image::DynamicImage;
use shared::ErrorCode;
use uuid::Uuid;

use crate::utils::AppError;

/// Maximum file size (5MB), enforced before any processing
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// JPEG quality for re-encoded document images
const JPEG_QUALITY: u8 = 85;

/// Images wider or taller than this are scaled down before encoding
const MAX_IMAGE_DIMENSION: u32 = 1600;

/// URL prefix that serves stored files
pub const FILES_URL_PREFIX: &str = "/api/files/";

/// Local-disk blob store rooted at `{work_dir}/uploads`
#[derive(Debug, Clone)]
pub struct BlobStore {
    root: PathBuf,
}

impl BlobStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reject files that are empty, oversized or of an unsupported type
    pub fn validate(data: &[u8], content_type: &str) -> Result<(), AppError> {
        if data.is_empty() {
            return Err(AppError::validation("Empty file provided"));
        }
        if data.len() > MAX_FILE_SIZE {
            return Err(AppError::with_message(ErrorCode::DocumentTooLarge, format!(
                "File too large. Maximum size is {}MB",
                MAX_FILE_SIZE / 1024 / 1024
            )));
        }
        if !content_type.starts_with("image/") && content_type != "application/pdf" {
            return Err(
                AppError::with_message(ErrorCode::UnsupportedDocumentType, format!(
                    "Unsupported file type '{}'. Only images and PDF are accepted",
                    content_type
                )),
            );
        }
        Ok(())
    }

    /// Store a document and return its serving URL
    ///
    /// Images are decoded, scaled down when oversized and re-encoded as
    /// JPEG; anything else (PDF) is written as-is.
    pub fn store(
        &self,
        phone: &str,
        category: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<String, AppError> {
        Self::validate(data, content_type)?;

        let is_image = content_type.starts_with("image/");
        let (bytes, ext) = if is_image {
            (compress_image(data)?, "jpg")
        } else {
            (data.to_vec(), "pdf")
        };

        let suffix = Uuid::new_v4().simple().to_string();
        let rel_path = format!(
            "employees/{}/{}/{}_{}.{}",
            phone,
            category,
            Utc::now().timestamp_millis(),
            &suffix[..8],
            ext
        );

        let full_path = self.root.join(&rel_path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                AppError::storage(format!("Failed to create upload directory: {}", e))
            })?;
        }
        fs::write(&full_path, &bytes)
            .map_err(|e| AppError::storage(format!("Failed to save file: {}", e)))?;

        tracing::debug!(path = %rel_path, size = bytes.len(), "stored document");
        Ok(format!("{}{}", FILES_URL_PREFIX, rel_path))
    }

    /// Resolve a serving URL back to a path under the store root
    ///
    /// Rejects URLs outside the store and any path that climbs upward.
    fn resolve(&self, url: &str) -> Result<PathBuf, AppError> {
        let rel = url
            .strip_prefix(FILES_URL_PREFIX)
            .ok_or_else(|| AppError::validation(format!("Not a stored file URL: {}", url)))?;

        let rel_path = Path::new(rel);
        let climbs = rel_path
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)));
        if climbs || rel.is_empty() {
            return Err(AppError::validation(format!("Invalid file path: {}", rel)));
        }

        Ok(self.root.join(rel_path))
    }

    /// Read a stored document back
    pub fn read_by_url(&self, url: &str) -> Result<Vec<u8>, AppError> {
        let path = self.resolve(url)?;
        fs::read(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("File {}", url))
            } else {
                AppError::storage(format!("Failed to read file: {}", e))
            }
        })
    }

    /// Delete a stored document; a missing file is not an error
    pub fn delete_by_url(&self, url: &str) -> Result<(), AppError> {
        let path = self.resolve(url)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(url = %url, "blob already gone");
                Ok(())
            }
            Err(e) => Err(AppError::storage(format!("Failed to delete file: {}", e))),
        }
    }

    /// Serve path for the files endpoint (same traversal rules as resolve)
    pub fn path_for(&self, rel: &str) -> Result<PathBuf, AppError> {
        self.resolve(&format!("{}{}", FILES_URL_PREFIX, rel))
    }
}

/// Decode, bound dimensions and re-encode as JPEG
fn compress_image(data: &[u8]) -> Result<Vec<u8>, AppError> {
    let img = image::load_from_memory(data)
        .map_err(|e| AppError::validation(format!("Invalid image: {}", e)))?;

    let img = if img.width() > MAX_IMAGE_DIMENSION || img.height() > MAX_IMAGE_DIMENSION {
        img.resize(
            MAX_IMAGE_DIMENSION,
            MAX_IMAGE_DIMENSION,
            image::imageops::FilterType::Lanczos3,
        )
    } else {
        img
    };

    encode_jpeg(&img)
}

fn encode_jpeg(img: &DynamicImage) -> Result<Vec<u8>, AppError> {
    let mut buffer = Vec::new();
    {
        let mut cursor = Cursor::new(&mut buffer);
        let rgb_img = img.to_rgb8();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
        rgb_img
            .write_with_encoder(encoder)
            .map_err(|e| AppError::storage(format!("Failed to compress image: {}", e)))?;
    }
    Ok(buffer)
}
