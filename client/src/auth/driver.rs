//! Per-mount guard driver.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds one `GuardMachine` to the identity provider for the lifetime of a
//! page mount:
//!
//! 1. Session Resolver: `get_current_session()` once per mount.
//! 2. Auth-Change Subscriber: attached right after resolution begins,
//!    detached exactly once on unmount.
//! 3. Redirect Executor: every redirect the machine emits is handed to the
//!    `Navigator` as a history-replacing navigation.
//!
//! The resolution future is returned to the caller so it can be spawned on
//! whatever local executor hosts the page (the browser microtask queue in
//! production, a `LocalPool` in tests).

#[cfg(test)]
#[path = "driver_test.rs"]
mod driver_test;

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use super::guard::{GuardMachine, GuardOutput, GuardPolicy, GuardState, GuardView, ResolveTicket};
use super::provider::{IdentityProvider, ProviderError, Subscription};
use super::session::{AuthEvent, Session};

/// Performs non-history-appending navigation.
pub trait Navigator {
    fn replace(&self, path: &str);
}

impl<F: Fn(&str)> Navigator for F {
    fn replace(&self, path: &str) {
        self(path);
    }
}

/// Read-only view of the machine handed to observers after each transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuardSnapshot {
    pub state: GuardState,
    pub view: GuardView,
    pub session: Option<Session>,
    pub notice: Option<String>,
}

impl GuardSnapshot {
    fn of(machine: &GuardMachine) -> Self {
        Self {
            state: machine.state(),
            view: machine.view(),
            session: machine.session().cloned(),
            notice: machine.notice().map(ToOwned::to_owned),
        }
    }
}

#[derive(Clone)]
struct Sink {
    machine: Rc<RefCell<GuardMachine>>,
    navigator: Rc<dyn Navigator>,
    observer: Rc<dyn Fn(GuardSnapshot)>,
}

impl Sink {
    fn resolution(&self, ticket: ResolveTicket, outcome: Result<Option<Session>, ProviderError>) {
        let output = self.machine.borrow_mut().apply_resolution(ticket, outcome);
        self.dispatch(output);
    }

    fn event(&self, event: &AuthEvent) {
        let (output, session_changed) = {
            let mut machine = self.machine.borrow_mut();
            let before = machine.session().cloned();
            let output = machine.apply_event(event);
            (output, machine.session() != before.as_ref())
        };
        // Same classification with new tokens (e.g. a refresh): observers
        // still need the current session, but nothing navigates.
        if output.is_none() && session_changed {
            let snapshot = GuardSnapshot::of(&self.machine.borrow());
            (self.observer)(snapshot);
            return;
        }
        self.dispatch(output);
    }

    fn dispatch(&self, output: Option<GuardOutput>) {
        let Some(output) = output else {
            return;
        };
        // Release the machine borrow before calling out: navigation may
        // unmount the page synchronously.
        let snapshot = GuardSnapshot::of(&self.machine.borrow());
        (self.observer)(snapshot);
        if let Some(path) = output.redirect {
            log::debug!("guard: replace-navigate to {path}");
            self.navigator.replace(&path);
        }
    }
}

/// Live guard for one page mount.
pub struct GuardDriver {
    machine: Rc<RefCell<GuardMachine>>,
    subscription: RefCell<Option<Subscription>>,
}

impl GuardDriver {
    /// Start guarding a page.
    ///
    /// Returns the driver and the session-resolution future; the future must
    /// be spawned for the guard to leave `Checking` unless an event arrives
    /// first.
    pub fn mount<P>(
        policy: GuardPolicy,
        provider: P,
        navigator: Rc<dyn Navigator>,
        observer: Rc<dyn Fn(GuardSnapshot)>,
    ) -> (Self, impl Future<Output = ()> + 'static)
    where
        P: IdentityProvider + 'static,
    {
        let machine = Rc::new(RefCell::new(GuardMachine::new(policy)));
        let sink = Sink { machine: machine.clone(), navigator, observer };

        let ticket = machine.borrow().begin_resolve();

        let event_sink = sink.clone();
        let subscription = provider.subscribe_to_auth_changes(Rc::new(move |event: AuthEvent| {
            event_sink.event(&event);
        }));

        let resolve = async move {
            let outcome = provider.get_current_session().await;
            sink.resolution(ticket, outcome);
        };

        let driver = Self { machine, subscription: RefCell::new(Some(subscription)) };
        (driver, resolve)
    }

    #[must_use]
    pub fn snapshot(&self) -> GuardSnapshot {
        GuardSnapshot::of(&self.machine.borrow())
    }

    /// Detach from the provider and discard any pending resolution. Idempotent.
    pub fn unmount(&self) {
        self.machine.borrow_mut().unmount();
        if let Some(subscription) = self.subscription.borrow_mut().take() {
            subscription.unsubscribe();
        }
    }

    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.subscription.borrow().is_some()
    }
}

impl Drop for GuardDriver {
    fn drop(&mut self) {
        self.unmount();
    }
}
