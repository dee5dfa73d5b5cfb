//! OAuth implicit-flow callback handling.
//!
//! The provider returns to `/auth/callback#access_token=...&refresh_token=...`.
//! The fragment never reaches the server, so this runs in the browser: parse
//! the fragment, install the session, and pick where to go next. Any missing
//! piece aborts with no partial session installed.

#[cfg(test)]
#[path = "callback_test.rs"]
mod callback_test;

use serde::Deserialize;

use super::guard::DEFAULT_DASHBOARD_PATH;
use super::provider::{IdentityProvider, ProviderError};

/// Where a failed callback lands.
pub const OAUTH_FAILURE_REDIRECT: &str = "/auth/login?error=oauth";

/// Tokens carried by a successful callback fragment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallbackTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: Option<i64>,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum CallbackError {
    #[error("callback fragment has no access_token")]
    MissingAccessToken,
    #[error("callback fragment has no refresh_token")]
    MissingRefreshToken,
    #[error("provider reported {error}: {description}")]
    Provider { error: String, description: String },
    #[error("malformed callback fragment: {0}")]
    Malformed(String),
    #[error(transparent)]
    Session(#[from] ProviderError),
}

#[derive(Debug, Default, Deserialize)]
struct Fragment {
    access_token: Option<String>,
    refresh_token: Option<String>,
    expires_in: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parse a URL fragment (with or without the leading `#`).
///
/// # Errors
///
/// Returns an error when the provider reported a failure or a token is missing.
pub fn parse_fragment(fragment: &str) -> Result<CallbackTokens, CallbackError> {
    let raw = fragment.strip_prefix('#').unwrap_or(fragment);
    let parsed: Fragment = serde_urlencoded::from_str(raw).map_err(|e| CallbackError::Malformed(e.to_string()))?;

    if let Some(error) = non_empty(parsed.error) {
        return Err(CallbackError::Provider { error, description: parsed.error_description.unwrap_or_default() });
    }
    let access_token = non_empty(parsed.access_token).ok_or(CallbackError::MissingAccessToken)?;
    let refresh_token = non_empty(parsed.refresh_token).ok_or(CallbackError::MissingRefreshToken)?;
    let expires_in = parsed.expires_in.and_then(|v| v.parse::<i64>().ok());

    Ok(CallbackTokens { access_token, refresh_token, expires_in })
}

/// Complete the callback and return the path to replace-navigate to.
///
/// `set_session` is only called once both tokens are present.
pub async fn complete_oauth_callback<P: IdentityProvider>(provider: &P, fragment: &str) -> String {
    match try_complete(provider, fragment).await {
        Ok(()) => DEFAULT_DASHBOARD_PATH.to_owned(),
        Err(e) => {
            log::warn!("oauth callback failed: {e}");
            OAUTH_FAILURE_REDIRECT.to_owned()
        }
    }
}

async fn try_complete<P: IdentityProvider>(provider: &P, fragment: &str) -> Result<(), CallbackError> {
    let tokens = parse_fragment(fragment)?;
    provider
        .set_session(&tokens.access_token, &tokens.refresh_token, tokens.expires_in)
        .await?;
    Ok(())
}

/// Whether the login page was reached from a failed OAuth callback.
#[must_use]
pub fn is_oauth_error_query(query: &str) -> bool {
    let raw = query.strip_prefix('?').unwrap_or(query);
    serde_urlencoded::from_str::<Vec<(String, String)>>(raw)
        .map(|pairs| pairs.iter().any(|(k, v)| k == "error" && v == "oauth"))
        .unwrap_or(false)
}
