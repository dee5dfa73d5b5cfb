//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! The media uploader sits behind a trait object so handler tests can
//! substitute a recording fake for the real media host.

use std::sync::Arc;

use crate::services::media::MediaUploader;

/// Shared application state, injected into Axum handlers via State extractor.
#[derive(Clone)]
pub struct AppState {
    /// `None` if media host credentials are not configured.
    pub uploader: Option<Arc<dyn MediaUploader>>,
}

impl AppState {
    #[must_use]
    pub fn new(uploader: Option<Arc<dyn MediaUploader>>) -> Self {
        Self { uploader }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use std::sync::Mutex;

    use super::*;
    use crate::services::media::{MediaError, UploadFile, UploadedMedia};

    /// Uploader that records every call and answers with a canned result.
    #[derive(Default)]
    pub struct RecordingUploader {
        pub calls: Mutex<Vec<UploadFile>>,
        pub fail_with: Option<String>,
    }

    impl RecordingUploader {
        #[must_use]
        pub fn failing(message: &str) -> Self {
            Self { calls: Mutex::new(Vec::new()), fail_with: Some(message.to_owned()) }
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait::async_trait]
    impl MediaUploader for RecordingUploader {
        async fn upload(&self, file: UploadFile) -> Result<UploadedMedia, MediaError> {
            let bytes = file.bytes.len() as u64;
            let format = file.content_type.trim_start_matches("image/").to_owned();
            self.calls.lock().unwrap().push(file);
            if let Some(message) = &self.fail_with {
                return Err(MediaError::Rejected { status: 500, message: message.clone() });
            }
            Ok(UploadedMedia {
                secure_url: "https://res.cloudinary.com/demo/image/upload/test.png".into(),
                public_id: "festival/test".into(),
                width: 1,
                height: 1,
                format,
                resource_type: "image".into(),
                created_at: "2026-01-01T00:00:00Z".into(),
                bytes,
            })
        }
    }

    /// `AppState` without media credentials.
    #[must_use]
    pub fn test_app_state() -> AppState {
        AppState::new(None)
    }

    /// `AppState` backed by the given uploader.
    #[must_use]
    pub fn test_app_state_with_uploader(uploader: Arc<RecordingUploader>) -> AppState {
        AppState::new(Some(uploader))
    }
}
