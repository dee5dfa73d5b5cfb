//! Server configuration parsed from environment variables.
//!
//! DESIGN
//! ======
//! Parsing goes through a lookup function so tests can feed a map instead of
//! mutating the process environment. Media hosting is optional: when any of
//! its three credentials is missing the server still starts and the upload
//! endpoint answers 503.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use crate::services::media::CloudinaryConfig;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_UPLOAD_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    /// `None` disables uploads.
    pub media: Option<CloudinaryConfig>,
    pub upload_timeout_secs: u64,
}

impl AppConfig {
    /// Build typed config from the process environment.
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `CLOUDINARY_CLOUD_NAME`, `CLOUDINARY_API_KEY`, `CLOUDINARY_API_SECRET`:
    ///   all three enable uploads
    /// - `CLOUDINARY_FOLDER`: upload folder on the media host
    /// - `UPLOAD_TIMEOUT_SECS`: default 30
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` when a numeric variable does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// # Errors
    ///
    /// See [`AppConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = parse_or("PORT", lookup("PORT"), DEFAULT_PORT)?;
        let upload_timeout_secs =
            parse_or("UPLOAD_TIMEOUT_SECS", lookup("UPLOAD_TIMEOUT_SECS"), DEFAULT_UPLOAD_TIMEOUT_SECS)?;

        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());
        let media = match (
            non_empty("CLOUDINARY_CLOUD_NAME"),
            non_empty("CLOUDINARY_API_KEY"),
            non_empty("CLOUDINARY_API_SECRET"),
        ) {
            (Some(cloud_name), Some(api_key), Some(api_secret)) => {
                Some(CloudinaryConfig { cloud_name, api_key, api_secret, folder: non_empty("CLOUDINARY_FOLDER") })
            }
            _ => None,
        };

        Ok(Self { port, media, upload_timeout_secs })
    }
}

fn parse_or<T: std::str::FromStr>(var: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value: value.to_owned() }),
    }
}
