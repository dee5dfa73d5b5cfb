use std::cell::Cell;

use super::*;

fn recorder() -> (Rc<RefCell<Vec<&'static str>>>, AuthCallback) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let cb: AuthCallback = Rc::new(move |ev: AuthEvent| sink.borrow_mut().push(ev.label()));
    (seen, cb)
}

#[test]
fn subscription_detaches_once_on_unsubscribe() {
    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();
    let sub = Subscription::new(move || counter.set(counter.get() + 1));
    sub.unsubscribe();
    assert_eq!(calls.get(), 1);
}

#[test]
fn subscription_detaches_on_drop() {
    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();
    {
        let _sub = Subscription::new(move || counter.set(counter.get() + 1));
    }
    assert_eq!(calls.get(), 1);
}

#[test]
fn listeners_deliver_in_order() {
    let listeners = AuthListeners::new();
    let (seen, cb) = recorder();
    let _sub = listeners.subscribe(cb);
    listeners.emit(&AuthEvent::SignedOut);
    listeners.emit(&AuthEvent::Other(None));
    assert_eq!(*seen.borrow(), vec!["signed_out", "other"]);
}

#[test]
fn listeners_stop_after_unsubscribe() {
    let listeners = AuthListeners::new();
    let (seen, cb) = recorder();
    let sub = listeners.subscribe(cb);
    assert_eq!(listeners.len(), 1);
    sub.unsubscribe();
    assert!(listeners.is_empty());
    listeners.emit(&AuthEvent::SignedOut);
    assert!(seen.borrow().is_empty());
}

#[test]
fn listeners_only_detach_their_own_entry() {
    let listeners = AuthListeners::new();
    let (first_seen, first) = recorder();
    let (second_seen, second) = recorder();
    let first_sub = listeners.subscribe(first);
    let _second_sub = listeners.subscribe(second);
    first_sub.unsubscribe();
    listeners.emit(&AuthEvent::SignedOut);
    assert!(first_seen.borrow().is_empty());
    assert_eq!(*second_seen.borrow(), vec!["signed_out"]);
}

#[test]
fn listeners_allow_reentrant_unsubscribe() {
    let listeners = AuthListeners::new();
    let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
    let slot_cb = slot.clone();
    let sub = listeners.subscribe(Rc::new(move |_| {
        if let Some(sub) = slot_cb.borrow_mut().take() {
            sub.unsubscribe();
        }
    }));
    *slot.borrow_mut() = Some(sub);
    listeners.emit(&AuthEvent::SignedOut);
    assert!(listeners.is_empty());
}

#[test]
fn provider_error_status_displays_message_verbatim() {
    let err = ProviderError::Status { status: 400, message: "Email not confirmed".to_owned() };
    assert_eq!(err.to_string(), "Email not confirmed");
}
