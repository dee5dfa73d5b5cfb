use super::*;
use crate::auth::testing::session_for;

#[test]
fn auth_state_default_is_loading_without_session() {
    let state = AuthState::default();
    assert!(state.session.is_none());
    assert_eq!(state.view, GuardView::Loading);
    assert!(state.notice.is_none());
}

#[test]
fn user_label_uses_session_identity() {
    let state = AuthState { session: Some(session_for("lead@example.com")), ..AuthState::default() };
    assert_eq!(state.user_label().as_deref(), Some("lead@example.com"));
}

#[test]
fn user_label_absent_when_signed_out() {
    assert!(AuthState::default().user_label().is_none());
}
