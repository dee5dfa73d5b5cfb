//! Upload route: validate a multipart image and proxy it to the media host.
//!
//! ERROR HANDLING
//! ==============
//! Every failure answers with `{ "error": string }`. Validation failures are
//! 400 and never reach the media host; media host failures are 502; a server
//! without media credentials answers 503.

#[cfg(test)]
#[path = "upload_test.rs"]
mod upload_test;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;

use crate::services::media::{UploadFile, UploadedMedia};
use crate::services::upload::{UploadError, validate_upload};
use crate::state::AppState;

/// Multipart field carrying the image.
pub const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub data: UploadedMedia,
}

pub(crate) fn upload_error_to_status(err: &UploadError) -> StatusCode {
    match err {
        UploadError::MissingFile
        | UploadError::UnsupportedType(_)
        | UploadError::TooLarge { .. }
        | UploadError::Multipart(_) => StatusCode::BAD_REQUEST,
        UploadError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
        UploadError::Media(_) => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        let status = upload_error_to_status(&self);
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

/// `POST /api/upload`.
pub async fn upload(State(state): State<AppState>, multipart: Multipart) -> Result<Json<UploadResponse>, UploadError> {
    let result = handle_upload(&state, multipart).await;
    match &result {
        Err(e @ UploadError::Media(_)) => tracing::error!(error = %e, "media host upload failed"),
        Err(e) => tracing::warn!(error = %e, "upload rejected"),
        Ok(media) => tracing::info!(public_id = %media.public_id, bytes = media.bytes, "upload stored"),
    }
    Ok(Json(UploadResponse { success: true, data: result? }))
}

async fn handle_upload(state: &AppState, multipart: Multipart) -> Result<UploadedMedia, UploadError> {
    let file = read_file_field(multipart).await?;
    let content_type = validate_upload(Some(&file.content_type), file.bytes.len())?;
    let uploader = state.uploader.as_ref().ok_or(UploadError::NotConfigured)?;
    Ok(uploader.upload(UploadFile { content_type, ..file }).await?)
}

async fn read_file_field(mut multipart: Multipart) -> Result<UploadFile, UploadError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| UploadError::Multipart(e.body_text()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_owned();
        let content_type = field.content_type().unwrap_or_default().to_owned();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| UploadError::Multipart(e.body_text()))?;
        if bytes.is_empty() && content_type.is_empty() {
            return Err(UploadError::MissingFile);
        }
        return Ok(UploadFile { file_name, content_type, bytes: bytes.to_vec() });
    }
    Err(UploadError::MissingFile)
}
