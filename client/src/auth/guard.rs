//! Route guard state machine.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every guarded page (protected or guest-only) runs one `GuardMachine` per
//! mount. It starts in `Checking`, is fed the initial session resolution and
//! every pushed `AuthEvent`, and answers with what to render and where, if
//! anywhere, to redirect.
//!
//! DESIGN
//! ======
//! The machine is pure: no I/O, no timers, no reactive runtime. The driver
//! applies its outputs (view updates + replace-navigation).
//!
//! Ordering: resolution and events race. Each applied event bumps an epoch;
//! a resolution only applies if no event has been applied since it began, so
//! an in-flight `resolve()` can never overwrite state reached through a newer
//! event. After `unmount` every input is discarded.
//!
//! Redirects are emitted only on classification changes, so repeated
//! identical events never navigate twice.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use super::provider::ProviderError;
use super::session::{AuthEvent, Session};

pub const DEFAULT_LOGIN_PATH: &str = "/auth/login";
pub const DEFAULT_DASHBOARD_PATH: &str = "/dashboard";

/// Audience declared by a guarded page, with its redirect destinations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardPolicy {
    /// Requires a session. Anonymous callers go to `login`; a caller who
    /// signs in while parked on this page is sent to `target`.
    Protected { login: String, target: String },
    /// Must not be shown to a signed-in caller, who is sent to `dashboard`.
    GuestOnly { dashboard: String },
}

impl GuardPolicy {
    #[must_use]
    pub fn protected() -> Self {
        Self::Protected { login: DEFAULT_LOGIN_PATH.to_owned(), target: DEFAULT_DASHBOARD_PATH.to_owned() }
    }

    #[must_use]
    pub fn guest_only() -> Self {
        Self::GuestOnly { dashboard: DEFAULT_DASHBOARD_PATH.to_owned() }
    }

    #[must_use]
    pub fn is_protected(&self) -> bool {
        matches!(self, Self::Protected { .. })
    }
}

/// Caller classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardState {
    Checking,
    Authenticated,
    Anonymous,
}

/// What the guarded page should render right now.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardView {
    /// Non-interactive loading indicator; nothing conclusive.
    Loading,
    /// The page's real content.
    Content,
    /// A redirect is under way; render nothing conclusive.
    Redirecting,
}

/// Result of an applied transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuardOutput {
    pub view: GuardView,
    /// Destination for a history-replacing navigation.
    pub redirect: Option<String>,
}

/// Token tying a resolution result to the epoch it was started in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolveTicket {
    epoch: u64,
}

#[derive(Debug)]
pub struct GuardMachine {
    policy: GuardPolicy,
    state: GuardState,
    session: Option<Session>,
    notice: Option<String>,
    epoch: u64,
    mounted: bool,
}

impl GuardMachine {
    #[must_use]
    pub fn new(policy: GuardPolicy) -> Self {
        Self { policy, state: GuardState::Checking, session: None, notice: None, epoch: 0, mounted: true }
    }

    #[must_use]
    pub fn policy(&self) -> &GuardPolicy {
        &self.policy
    }

    #[must_use]
    pub fn state(&self) -> GuardState {
        self.state
    }

    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// User-visible notice (set when a guest page could not verify the session).
    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    #[must_use]
    pub fn view(&self) -> GuardView {
        match (self.state, self.policy.is_protected()) {
            (GuardState::Checking, _) => GuardView::Loading,
            (GuardState::Authenticated, true) | (GuardState::Anonymous, false) => GuardView::Content,
            (GuardState::Anonymous, true) | (GuardState::Authenticated, false) => GuardView::Redirecting,
        }
    }

    /// Mark the start of a session resolution.
    pub fn begin_resolve(&self) -> ResolveTicket {
        ResolveTicket { epoch: self.epoch }
    }

    /// Apply the outcome of a resolution started with `ticket`.
    ///
    /// Returns `None` when the result is discarded (unmounted, superseded by a
    /// newer event) or changes nothing.
    pub fn apply_resolution(
        &mut self,
        ticket: ResolveTicket,
        outcome: Result<Option<Session>, ProviderError>,
    ) -> Option<GuardOutput> {
        if !self.mounted {
            log::debug!("guard: resolution after unmount discarded");
            return None;
        }
        if ticket.epoch != self.epoch {
            log::debug!("guard: stale resolution discarded (epoch {} < {})", ticket.epoch, self.epoch);
            return None;
        }
        match outcome {
            Ok(session) => self.classify(session, None),
            Err(e) => {
                log::warn!("guard: session resolution failed: {e}");
                let notice = (!self.policy.is_protected())
                    .then(|| format!("We couldn't verify your sign-in status ({e}). You can still continue."));
                self.classify(None, notice)
            }
        }
    }

    /// Apply a pushed auth event. Events always win over older resolutions.
    pub fn apply_event(&mut self, event: &AuthEvent) -> Option<GuardOutput> {
        if !self.mounted {
            return None;
        }
        self.epoch += 1;
        self.classify(event.session().cloned(), None)
    }

    /// Stop accepting input. Idempotent.
    pub fn unmount(&mut self) {
        self.mounted = false;
    }

    fn classify(&mut self, session: Option<Session>, notice: Option<String>) -> Option<GuardOutput> {
        let next = if session.is_some() { GuardState::Authenticated } else { GuardState::Anonymous };
        let prev = self.state;
        self.session = session;

        if prev == next {
            return None;
        }
        self.state = next;
        self.notice = notice;

        let redirect = match (&self.policy, prev, next) {
            (GuardPolicy::Protected { login, .. }, _, GuardState::Anonymous) => Some(login.clone()),
            (GuardPolicy::Protected { target, .. }, GuardState::Anonymous, GuardState::Authenticated) => {
                Some(target.clone())
            }
            (GuardPolicy::GuestOnly { dashboard }, _, GuardState::Authenticated) => Some(dashboard.clone()),
            _ => None,
        };
        log::debug!("guard: {prev:?} -> {next:?} redirect={redirect:?}");
        Some(GuardOutput { view: self.view(), redirect })
    }
}
