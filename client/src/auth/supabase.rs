//! Hosted identity-provider client.
//!
//! SYSTEM CONTEXT
//! ==============
//! Talks to the hosted auth REST API (`/auth/v1/*`) and keeps the session in
//! browser storage. It is the only component that writes the session; pages
//! and guards read it through `IdentityProvider`.
//!
//! TRADE-OFFS
//! ==========
//! `set_session` does not decode the JWT. It takes the lifetime the provider
//! reported alongside the tokens and only falls back to the provider's
//! default one-hour lifetime when none was given. Pages call
//! `fresh_session` before each backend call so a long-mounted page never
//! sends an expired token.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "supabase_test.rs"]
mod supabase_test;

use std::cell::RefCell;
use std::rc::Rc;

use serde::Deserialize;
use uuid::Uuid;

use super::provider::{AuthCallback, AuthListeners, IdentityProvider, ProviderError, Subscription};
use super::session::{AuthEvent, Session};
use crate::config::PublicConfig;
use crate::net::http::{self, BrowserTransport, HttpReply, Method, Transport};

/// Refresh when the access token expires within this many seconds.
pub const REFRESH_LEEWAY_SECS: i64 = 60;
/// Provider default access-token lifetime.
const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 3600;
#[cfg(feature = "hydrate")]
const STORAGE_KEY: &str = "festival.auth.session";

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct ProviderUser {
    pub id: Uuid,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenGrant {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: Option<i64>,
    pub expires_at: Option<i64>,
    pub user: ProviderUser,
}

impl TokenGrant {
    pub(crate) fn into_session(self, now_secs: i64) -> Session {
        let expires_at = self
            .expires_at
            .unwrap_or_else(|| now_secs + self.expires_in.unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS));
        Session {
            user_id: self.user.id,
            email: self.user.email,
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
        }
    }
}

fn status_error(reply: &HttpReply) -> ProviderError {
    ProviderError::Status { status: reply.status, message: http::error_message(reply) }
}

fn parse_json<T: serde::de::DeserializeOwned>(reply: &HttpReply) -> Result<T, ProviderError> {
    if !reply.ok() {
        return Err(status_error(reply));
    }
    serde_json::from_str(&reply.body).map_err(|e| ProviderError::Malformed(e.to_string()))
}

/// Token rejected outright (as opposed to the provider being unreachable).
fn is_rejection(err: &ProviderError) -> bool {
    matches!(err, ProviderError::Status { status: 400 | 401 | 403, .. })
}

fn query(pairs: &[(&str, &str)]) -> String {
    serde_urlencoded::to_string(pairs).unwrap_or_default()
}

pub(crate) fn authorize_url(config: &PublicConfig, provider: &str, redirect_to: &str) -> String {
    format!("{}?{}", config.endpoint("auth/v1/authorize"), query(&[("provider", provider), ("redirect_to", redirect_to)]))
}

pub(crate) fn recover_url(config: &PublicConfig, redirect_to: &str) -> String {
    format!("{}?{}", config.endpoint("auth/v1/recover"), query(&[("redirect_to", redirect_to)]))
}

pub(crate) fn refresh_url(config: &PublicConfig) -> String {
    format!("{}?grant_type=refresh_token", config.endpoint("auth/v1/token"))
}

fn now_secs() -> i64 {
    #[cfg(feature = "hydrate")]
    {
        #[allow(clippy::cast_possible_truncation)]
        let secs = (js_sys::Date::now() / 1000.0) as i64;
        secs
    }
    #[cfg(not(feature = "hydrate"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(0, |d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
    }
}

// =============================================================================
// SESSION STORE
// =============================================================================

/// Where the provider runtime keeps the current session between page loads.
pub trait SessionStore {
    fn load(&self) -> Option<Session>;
    fn save(&self, session: &Session);
    fn clear(&self);
}

/// `localStorage`-backed store. A no-op outside the browser.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStore;

#[cfg(feature = "hydrate")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

impl SessionStore for BrowserStore {
    fn load(&self) -> Option<Session> {
        #[cfg(feature = "hydrate")]
        {
            let raw = local_storage()?.get_item(STORAGE_KEY).ok().flatten()?;
            serde_json::from_str(&raw).ok()
        }
        #[cfg(not(feature = "hydrate"))]
        {
            None
        }
    }

    fn save(&self, session: &Session) {
        #[cfg(feature = "hydrate")]
        {
            if let (Some(storage), Ok(raw)) = (local_storage(), serde_json::to_string(session)) {
                let _ = storage.set_item(STORAGE_KEY, &raw);
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = session;
        }
    }

    fn clear(&self) {
        #[cfg(feature = "hydrate")]
        {
            if let Some(storage) = local_storage() {
                let _ = storage.remove_item(STORAGE_KEY);
            }
        }
    }
}

/// In-memory store, used on the server render path and in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    session: RefCell<Option<Session>>,
}

impl SessionStore for MemoryStore {
    fn load(&self) -> Option<Session> {
        self.session.borrow().clone()
    }

    fn save(&self, session: &Session) {
        *self.session.borrow_mut() = Some(session.clone());
    }

    fn clear(&self) {
        self.session.borrow_mut().take();
    }
}

// =============================================================================
// CLIENT
// =============================================================================

struct Inner<T> {
    config: PublicConfig,
    store: Box<dyn SessionStore>,
    listeners: AuthListeners,
    transport: T,
}

/// Cheaply clonable handle; clones share storage and listeners.
pub struct SupabaseAuth<T = BrowserTransport> {
    inner: Rc<Inner<T>>,
}

impl<T> Clone for SupabaseAuth<T> {
    fn clone(&self) -> Self {
        Self { inner: Rc::clone(&self.inner) }
    }
}

impl SupabaseAuth {
    /// Client persisting to browser storage.
    #[must_use]
    pub fn new(config: PublicConfig) -> Self {
        Self::with_store(config, BrowserStore)
    }

    #[must_use]
    pub fn with_store(config: PublicConfig, store: impl SessionStore + 'static) -> Self {
        Self::with_transport(config, store, BrowserTransport)
    }
}

impl<T: Transport> SupabaseAuth<T> {
    #[must_use]
    pub fn with_transport(config: PublicConfig, store: impl SessionStore + 'static, transport: T) -> Self {
        Self {
            inner: Rc::new(Inner { config, store: Box::new(store), listeners: AuthListeners::new(), transport }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &PublicConfig {
        &self.inner.config
    }

    /// Session currently held in storage, without contacting the provider.
    #[must_use]
    pub fn stored_session(&self) -> Option<Session> {
        self.inner.store.load()
    }

    fn configured(&self) -> Result<&PublicConfig, ProviderError> {
        let config = &self.inner.config;
        if config.is_configured() { Ok(config) } else { Err(ProviderError::NotConfigured) }
    }

    fn headers(&self, bearer: Option<&str>) -> Vec<(&'static str, String)> {
        let mut headers = vec![("apikey", self.inner.config.supabase_anon_key.clone())];
        if let Some(token) = bearer {
            headers.push(("Authorization", format!("Bearer {token}")));
        }
        headers
    }

    async fn call(
        &self,
        method: Method,
        url: &str,
        bearer: Option<&str>,
        body: Option<&serde_json::Value>,
    ) -> Result<HttpReply, ProviderError> {
        self.inner
            .transport
            .send(method, url, &self.headers(bearer), body)
            .await
            .map_err(ProviderError::Network)
    }

    async fn fetch_user(&self, access_token: &str) -> Result<ProviderUser, ProviderError> {
        let config = self.configured()?;
        let reply = self
            .call(Method::Get, &config.endpoint("auth/v1/user"), Some(access_token), None)
            .await?;
        parse_json(&reply)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<Session, ProviderError> {
        let config = self.configured()?;
        let body = serde_json::json!({ "refresh_token": refresh_token });
        let reply = self
            .call(Method::Post, &refresh_url(config), None, Some(&body))
            .await?;
        let grant: TokenGrant = parse_json(&reply)?;
        Ok(grant.into_session(now_secs()))
    }

    /// Stored session, refreshed first when it is about to expire.
    ///
    /// Unlike `get_current_session` this trusts an unexpired token without a
    /// round trip, so pages can call it before every backend request.
    ///
    /// # Errors
    ///
    /// Fails when the provider is unconfigured or a needed refresh cannot
    /// reach it.
    pub async fn fresh_session(&self) -> Result<Option<Session>, ProviderError> {
        self.configured()?;
        match self.inner.store.load() {
            Some(stored) if stored.is_expired(now_secs(), REFRESH_LEEWAY_SECS) => self.refresh_stored(&stored).await,
            stored => Ok(stored),
        }
    }

    /// Refresh `stored`, persisting and announcing the new session.
    /// A rejected refresh token clears storage, announces the sign-out and
    /// yields `Ok(None)`.
    async fn refresh_stored(&self, stored: &Session) -> Result<Option<Session>, ProviderError> {
        match self.refresh(&stored.refresh_token).await {
            Ok(session) => {
                self.inner.store.save(&session);
                self.inner
                    .listeners
                    .emit(&AuthEvent::TokenRefreshed(session.clone()));
                Ok(Some(session))
            }
            Err(e) if is_rejection(&e) => {
                log::debug!("refresh token rejected: {e}");
                self.inner.store.clear();
                self.inner.listeners.emit(&AuthEvent::SignedOut);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

impl<T: Transport> IdentityProvider for SupabaseAuth<T> {
    async fn get_current_session(&self) -> Result<Option<Session>, ProviderError> {
        self.configured()?;
        let Some(stored) = self.inner.store.load() else {
            return Ok(None);
        };

        if stored.is_expired(now_secs(), REFRESH_LEEWAY_SECS) {
            return self.refresh_stored(&stored).await;
        }

        match self.fetch_user(&stored.access_token).await {
            Ok(user) => Ok(Some(Session { user_id: user.id, email: user.email, ..stored })),
            Err(e) if is_rejection(&e) => self.refresh_stored(&stored).await,
            Err(e) => Err(e),
        }
    }

    fn subscribe_to_auth_changes(&self, callback: AuthCallback) -> Subscription {
        self.inner.listeners.subscribe(callback)
    }

    async fn sign_in_with_provider(&self, provider: &str, redirect_to: &str) -> Result<(), ProviderError> {
        let url = authorize_url(self.configured()?, provider, redirect_to);
        #[cfg(feature = "hydrate")]
        {
            let window = web_sys::window().ok_or_else(|| ProviderError::Network("no window".to_owned()))?;
            window
                .location()
                .set_href(&url)
                .map_err(|e| ProviderError::Network(format!("{e:?}")))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = url;
            Err(ProviderError::Network("not available on server".to_owned()))
        }
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        if let (Ok(config), Some(stored)) = (self.configured(), self.inner.store.load()) {
            let logout = config.endpoint("auth/v1/logout");
            match self
                .call(Method::Post, &logout, Some(&stored.access_token), None)
                .await
            {
                Ok(reply) if !reply.ok() => log::warn!("logout rejected: {}", http::error_message(&reply)),
                Err(e) => log::warn!("logout request failed: {e}"),
                Ok(_) => {}
            }
        }
        self.inner.store.clear();
        self.inner.listeners.emit(&AuthEvent::SignedOut);
        Ok(())
    }

    async fn set_session(
        &self,
        access_token: &str,
        refresh_token: &str,
        expires_in: Option<i64>,
    ) -> Result<Session, ProviderError> {
        let user = self.fetch_user(access_token).await?;
        let session = Session {
            user_id: user.id,
            email: user.email,
            access_token: access_token.to_owned(),
            refresh_token: refresh_token.to_owned(),
            expires_at: now_secs() + expires_in.unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS),
        };
        self.inner.store.save(&session);
        self.inner
            .listeners
            .emit(&AuthEvent::SignedIn(session.clone()));
        Ok(session)
    }

    async fn send_password_reset(&self, email: &str, redirect_to: &str) -> Result<(), ProviderError> {
        let config = self.configured()?;
        let body = serde_json::json!({ "email": email });
        let reply = self
            .call(Method::Post, &recover_url(config, redirect_to), None, Some(&body))
            .await?;
        if reply.ok() { Ok(()) } else { Err(status_error(&reply)) }
    }
}
