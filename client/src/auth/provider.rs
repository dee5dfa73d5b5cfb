//! Identity-provider seam.
//!
//! ARCHITECTURE
//! ============
//! Everything the app needs from the hosted auth service goes through
//! `IdentityProvider`: six operations and nothing else. Guards, the OAuth
//! callback, and the dashboard are generic over it so they can be exercised
//! against an in-memory provider.
//!
//! The trait is single-threaded (`Rc` callbacks, non-`Send` futures) to match
//! the browser event loop it runs on.

#![allow(async_fn_in_trait)]

#[cfg(test)]
#[path = "provider_test.rs"]
mod provider_test;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::session::{AuthEvent, Session};

/// Callback invoked for each pushed auth event.
pub type AuthCallback = Rc<dyn Fn(AuthEvent)>;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("identity provider not configured")]
    NotConfigured,
    #[error("network error: {0}")]
    Network(String),
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("unexpected provider response: {0}")]
    Malformed(String),
    #[error("not signed in")]
    NoSession,
}

/// Operations consumed from the external identity/session provider.
pub trait IdentityProvider {
    /// Read (and validate) the session held by the provider runtime.
    async fn get_current_session(&self) -> Result<Option<Session>, ProviderError>;

    /// Register for auth events; dropping or unsubscribing the handle detaches.
    fn subscribe_to_auth_changes(&self, callback: AuthCallback) -> Subscription;

    /// Start a third-party sign-in, returning to `redirect_to` afterwards.
    async fn sign_in_with_provider(&self, provider: &str, redirect_to: &str) -> Result<(), ProviderError>;

    async fn sign_out(&self) -> Result<(), ProviderError>;

    /// Install a session from raw tokens (OAuth implicit-flow callback).
    /// `expires_in` is the access-token lifetime in seconds, when known.
    async fn set_session(
        &self,
        access_token: &str,
        refresh_token: &str,
        expires_in: Option<i64>,
    ) -> Result<Session, ProviderError>;

    async fn send_password_reset(&self, email: &str, redirect_to: &str) -> Result<(), ProviderError>;
}

// =============================================================================
// SUBSCRIPTION
// =============================================================================

/// Detach handle returned by `subscribe_to_auth_changes`.
///
/// The detach closure runs at most once: on `unsubscribe` or on drop,
/// whichever comes first.
#[must_use = "dropping a Subscription detaches it immediately"]
pub struct Subscription {
    detach: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(detach: impl FnOnce() + 'static) -> Self {
        Self { detach: Some(Box::new(detach)) }
    }

    /// A handle with nothing to detach.
    pub fn noop() -> Self {
        Self { detach: None }
    }

    pub fn unsubscribe(mut self) {
        self.detach_now();
    }

    fn detach_now(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("attached", &self.detach.is_some())
            .finish()
    }
}

// =============================================================================
// LISTENER REGISTRY
// =============================================================================

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, AuthCallback)>,
}

/// Ordered set of auth-event callbacks shared by a provider's clones.
#[derive(Clone, Default)]
pub struct AuthListeners {
    inner: Rc<RefCell<Listeners>>,
}

impl AuthListeners {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, callback: AuthCallback) -> Subscription {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.entries.push((id, callback));
            id
        };
        let weak: Weak<RefCell<Listeners>> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().entries.retain(|(entry, _)| *entry != id);
            }
        })
    }

    /// Deliver `event` to every listener in subscription order.
    ///
    /// The listener list is snapshotted first, so callbacks may subscribe or
    /// unsubscribe re-entrantly.
    pub fn emit(&self, event: &AuthEvent) {
        let snapshot: Vec<AuthCallback> = self
            .inner
            .borrow()
            .entries
            .iter()
            .map(|(_, cb)| cb.clone())
            .collect();
        log::debug!("auth event {} -> {} listener(s)", event.label(), snapshot.len());
        for callback in snapshot {
            callback(event.clone());
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
