//! In-memory identity provider for unit tests.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use futures::channel::oneshot;
use uuid::Uuid;

use super::provider::{AuthCallback, AuthListeners, IdentityProvider, ProviderError, Subscription};
use super::session::{AuthEvent, Session};
use crate::net::http::{HttpReply, Method, Transport};

pub fn session_for(email: &str) -> Session {
    Session {
        user_id: Uuid::new_v4(),
        email: Some(email.to_owned()),
        access_token: format!("at-{email}"),
        refresh_token: format!("rt-{email}"),
        expires_at: i64::MAX,
    }
}

type Resolution = Result<Option<Session>, ProviderError>;

#[derive(Default)]
struct Inner {
    listeners: AuthListeners,
    pending: RefCell<Option<oneshot::Receiver<Resolution>>>,
    immediate: RefCell<Option<Resolution>>,
    set_session_calls: RefCell<Vec<(String, String, Option<i64>)>>,
    set_session_result: RefCell<Option<Result<Session, ProviderError>>>,
    resolve_calls: Cell<usize>,
}

/// Fake provider whose session resolution can be held open and completed by
/// the test at a chosen moment.
#[derive(Clone, Default)]
pub struct FakeProvider {
    inner: Rc<Inner>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve immediately with `resolution`.
    pub fn resolving(resolution: Resolution) -> Self {
        let provider = Self::new();
        *provider.inner.immediate.borrow_mut() = Some(resolution);
        provider
    }

    /// Hold the next resolution open until the returned sender fires.
    pub fn deferred() -> (Self, oneshot::Sender<Resolution>) {
        let provider = Self::new();
        let (tx, rx) = oneshot::channel();
        *provider.inner.pending.borrow_mut() = Some(rx);
        (provider, tx)
    }

    pub fn emit(&self, event: &AuthEvent) {
        self.inner.listeners.emit(event);
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.len()
    }

    pub fn resolve_calls(&self) -> usize {
        self.inner.resolve_calls.get()
    }

    pub fn set_session_calls(&self) -> Vec<(String, String, Option<i64>)> {
        self.inner.set_session_calls.borrow().clone()
    }

    pub fn fail_set_session(&self, err: ProviderError) {
        *self.inner.set_session_result.borrow_mut() = Some(Err(err));
    }
}

impl IdentityProvider for FakeProvider {
    async fn get_current_session(&self) -> Result<Option<Session>, ProviderError> {
        self.inner.resolve_calls.set(self.inner.resolve_calls.get() + 1);
        if let Some(resolution) = self.inner.immediate.borrow_mut().take() {
            return resolution;
        }
        let pending = self.inner.pending.borrow_mut().take();
        match pending {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(ProviderError::Network("cancelled".to_owned()))),
            None => Ok(None),
        }
    }

    fn subscribe_to_auth_changes(&self, callback: AuthCallback) -> Subscription {
        self.inner.listeners.subscribe(callback)
    }

    async fn sign_in_with_provider(&self, _provider: &str, _redirect_to: &str) -> Result<(), ProviderError> {
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        self.inner.listeners.emit(&AuthEvent::SignedOut);
        Ok(())
    }

    async fn set_session(
        &self,
        access_token: &str,
        refresh_token: &str,
        expires_in: Option<i64>,
    ) -> Result<Session, ProviderError> {
        self.inner
            .set_session_calls
            .borrow_mut()
            .push((access_token.to_owned(), refresh_token.to_owned(), expires_in));
        if let Some(result) = self.inner.set_session_result.borrow_mut().take() {
            return result;
        }
        let mut session = session_for("oauth@example.com");
        session.access_token = access_token.to_owned();
        session.refresh_token = refresh_token.to_owned();
        self.inner.listeners.emit(&AuthEvent::SignedIn(session.clone()));
        Ok(session)
    }

    async fn send_password_reset(&self, _email: &str, _redirect_to: &str) -> Result<(), ProviderError> {
        Ok(())
    }
}

/// Transport answering from a queue of canned replies and recording what was
/// asked of it. An exhausted queue fails like an unreachable host.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    replies: Rc<RefCell<VecDeque<HttpReply>>>,
    requests: Rc<RefCell<Vec<(Method, String)>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, status: u16, body: &str) -> Self {
        self.replies
            .borrow_mut()
            .push_back(HttpReply { status, body: body.to_owned() });
        self
    }

    pub fn requests(&self) -> Vec<(Method, String)> {
        self.requests.borrow().clone()
    }
}

impl Transport for ScriptedTransport {
    async fn send(
        &self,
        method: Method,
        url: &str,
        _headers: &[(&str, String)],
        _body: Option<&serde_json::Value>,
    ) -> Result<HttpReply, String> {
        self.requests.borrow_mut().push((method, url.to_owned()));
        self.replies
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| "connection refused".to_owned())
    }
}
