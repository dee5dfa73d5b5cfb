//! Browser side of the image upload proxy (`POST /api/upload`).

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "upload_test.rs"]
mod upload_test;

use super::types::{UploadReply, UploadedImage};

pub const UPLOAD_ENDPOINT: &str = "/api/upload";
/// Multipart field carrying the file.
pub const UPLOAD_FIELD: &str = "file";

/// Interpret an `/api/upload` reply.
///
/// # Errors
///
/// Returns the server's `error` message verbatim, or a status-derived message
/// when the body is unreadable.
pub fn parse_upload_reply(status: u16, body: &str) -> Result<UploadedImage, String> {
    match serde_json::from_str::<UploadReply>(body) {
        Ok(UploadReply::Success { success: true, data }) => Ok(data),
        Ok(UploadReply::Success { success: false, .. }) => Err("upload failed".to_owned()),
        Ok(UploadReply::Failure { error }) => Err(error),
        Err(_) => Err(format!("upload failed: {status}")),
    }
}

/// Upload a user-selected file through the server proxy.
///
/// # Errors
///
/// Returns an error string if the request fails or the server rejects the file.
#[cfg(feature = "hydrate")]
pub async fn upload_image(file: &web_sys::File) -> Result<UploadedImage, String> {
    let form = web_sys::FormData::new().map_err(|e| format!("{e:?}"))?;
    form.append_with_blob_and_filename(UPLOAD_FIELD, file, &file.name())
        .map_err(|e| format!("{e:?}"))?;
    let resp = gloo_net::http::Request::post(UPLOAD_ENDPOINT)
        .body(form)
        .map_err(|e| e.to_string())?
        .send()
        .await
        .map_err(|e| e.to_string())?;
    let status = resp.status();
    let body = resp.text().await.map_err(|e| e.to_string())?;
    parse_upload_reply(status, &body)
}
