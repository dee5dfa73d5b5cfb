//! Session handle and auth-lifecycle events.
//!
//! SYSTEM CONTEXT
//! ==============
//! The identity provider owns the session; pages only ever read a cloned
//! handle. `AuthEvent` is the push notification the provider emits on every
//! session transition, and guards classify callers from whichever of the two
//! was observed most recently.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Proof of authentication issued by the identity provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Subject identifier of the signed-in user.
    pub user_id: Uuid,
    /// Email (display identity) of the signed-in user, if the provider shares it.
    pub email: Option<String>,
    /// Opaque bearer token for provider-backed APIs.
    pub access_token: String,
    /// Opaque token used to mint a new access token.
    pub refresh_token: String,
    /// Expiry as seconds since the Unix epoch.
    pub expires_at: i64,
}

impl Session {
    /// Whether the access token is expired, or will be within `leeway_secs`.
    #[must_use]
    pub fn is_expired(&self, now_secs: i64, leeway_secs: i64) -> bool {
        self.expires_at <= now_secs.saturating_add(leeway_secs)
    }

    /// Human-facing identity: the email when known, otherwise the user id.
    #[must_use]
    pub fn display_identity(&self) -> String {
        self.email.clone().unwrap_or_else(|| self.user_id.to_string())
    }
}

/// Session-lifecycle notification pushed by the identity provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn(Session),
    SignedOut,
    TokenRefreshed(Session),
    /// Any other provider notification; carries the session current at emit time.
    Other(Option<Session>),
}

impl AuthEvent {
    /// The session this event leaves in place, if any.
    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::SignedIn(s) | Self::TokenRefreshed(s) | Self::Other(Some(s)) => Some(s),
            Self::SignedOut | Self::Other(None) => None,
        }
    }

    /// Short label used in logs.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::SignedIn(_) => "signed_in",
            Self::SignedOut => "signed_out",
            Self::TokenRefreshed(_) => "token_refreshed",
            Self::Other(_) => "other",
        }
    }
}
