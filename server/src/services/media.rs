//! Media host client: signed image uploads to Cloudinary.
//!
//! SYSTEM CONTEXT
//! ==============
//! The upload route validates files locally and then hands them to a
//! `MediaUploader`. Production uses `CloudinaryClient`; tests substitute a
//! recording fake through `AppState`.
//!
//! Requests are signed server-side so the API secret never reaches the
//! browser. Pure helpers (`sign_params`, `parse_upload_response`) are split
//! out for testability.

#[cfg(test)]
#[path = "media_test.rs"]
mod media_test;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

const API_BASE_URL: &str = "https://api.cloudinary.com/v1_1";
const CONNECT_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// CONFIG
// =============================================================================

/// Media host credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub folder: Option<String>,
}

impl std::fmt::Debug for CloudinaryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("folder", &self.folder)
            .finish()
    }
}

impl CloudinaryConfig {
    #[must_use]
    pub fn upload_url(&self) -> String {
        format!("{API_BASE_URL}/{}/image/upload", self.cloud_name)
    }
}

// =============================================================================
// TYPES
// =============================================================================

/// A validated file ready to forward.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Metadata the media host returns for a stored image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedMedia {
    pub secure_url: String,
    pub public_id: String,
    pub width: u32,
    pub height: u32,
    pub format: String,
    pub resource_type: String,
    pub created_at: String,
    pub bytes: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("http client build failed: {0}")]
    HttpClientBuild(String),
    #[error("media host request failed: {0}")]
    Request(String),
    #[error("media host rejected upload ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("unexpected media host response: {0}")]
    Malformed(String),
}

/// Destination for validated uploads.
#[async_trait::async_trait]
pub trait MediaUploader: Send + Sync {
    async fn upload(&self, file: UploadFile) -> Result<UploadedMedia, MediaError>;
}

// =============================================================================
// SIGNING
// =============================================================================

/// Signature over `params`: sorted `key=value` pairs joined with `&`, then the
/// secret appended, hashed with SHA-256 and hex encoded.
#[must_use]
pub fn sign_params(params: &[(&str, String)], api_secret: &str) -> String {
    let mut sorted: Vec<&(&str, String)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let to_sign = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hasher.finalize().iter().map(|b| format!("{b:02x}")).collect()
}

/// Parameters covered by the signature for one upload.
#[must_use]
pub fn signed_params(config: &CloudinaryConfig, timestamp: i64) -> Vec<(&'static str, String)> {
    let mut params = vec![("timestamp", timestamp.to_string())];
    if let Some(folder) = &config.folder {
        params.push(("folder", folder.clone()));
    }
    params
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Interpret a media host reply.
///
/// # Errors
///
/// `Rejected` for non-2xx statuses (with the host's message when present),
/// `Malformed` when a success body lacks the expected fields.
pub fn parse_upload_response(status: u16, body: &str) -> Result<UploadedMedia, MediaError> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<ErrorEnvelope>(body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| body.to_owned());
        return Err(MediaError::Rejected { status, message });
    }
    serde_json::from_str(body).map_err(|e| MediaError::Malformed(e.to_string()))
}

// =============================================================================
// CLIENT
// =============================================================================

pub struct CloudinaryClient {
    http: reqwest::Client,
    config: CloudinaryConfig,
}

impl CloudinaryClient {
    /// # Errors
    ///
    /// Returns `HttpClientBuild` if the TLS backend cannot be initialized.
    pub fn new(config: CloudinaryConfig, timeout_secs: u64) -> Result<Self, MediaError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| MediaError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, config })
    }

    #[must_use]
    pub fn cloud_name(&self) -> &str {
        &self.config.cloud_name
    }
}

#[async_trait::async_trait]
impl MediaUploader for CloudinaryClient {
    async fn upload(&self, file: UploadFile) -> Result<UploadedMedia, MediaError> {
        let timestamp = time::OffsetDateTime::now_utc().unix_timestamp();
        let params = signed_params(&self.config, timestamp);
        let signature = sign_params(&params, &self.config.api_secret);

        let part = reqwest::multipart::Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&file.content_type)
            .map_err(|e| MediaError::Request(e.to_string()))?;
        let mut form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("api_key", self.config.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");
        for (key, value) in params {
            form = form.text(key, value);
        }

        let response = self
            .http
            .post(self.config.upload_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| MediaError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| MediaError::Request(e.to_string()))?;
        parse_upload_response(status, &text)
    }
}
