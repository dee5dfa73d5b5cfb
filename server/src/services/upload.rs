//! Upload validation: the only local rules applied before a file is
//! forwarded to the media host.

#[cfg(test)]
#[path = "upload_test.rs"]
mod upload_test;

use super::media::MediaError;

/// Inclusive size ceiling (5 MiB).
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Raster image types accepted for upload.
pub const ALLOWED_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "image/webp"];

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("no file provided")]
    MissingFile,
    #[error("unsupported file type: {0}")]
    UnsupportedType(String),
    #[error("file too large: {size} bytes exceeds the {max} byte limit")]
    TooLarge { size: usize, max: usize },
    #[error("invalid multipart body: {0}")]
    Multipart(String),
    #[error("uploads are not configured")]
    NotConfigured,
    #[error("upload failed: {0}")]
    Media(#[from] MediaError),
}

/// Lower-cased media type without parameters, e.g. `image/png`.
#[must_use]
pub fn normalize_content_type(raw: &str) -> String {
    raw.split(';').next().unwrap_or_default().trim().to_ascii_lowercase()
}

/// Check type and size of a candidate file.
///
/// # Errors
///
/// `MissingFile` for an empty type-less part, `UnsupportedType` when the
/// content type is not allow-listed, `TooLarge` above `MAX_UPLOAD_BYTES`.
pub fn validate_upload(content_type: Option<&str>, size: usize) -> Result<String, UploadError> {
    let content_type = content_type.map(normalize_content_type).unwrap_or_default();
    if content_type.is_empty() && size == 0 {
        return Err(UploadError::MissingFile);
    }
    if !ALLOWED_CONTENT_TYPES.contains(&content_type.as_str()) {
        return Err(UploadError::UnsupportedType(content_type));
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(UploadError::TooLarge { size, max: MAX_UPLOAD_BYTES });
    }
    Ok(content_type)
}
