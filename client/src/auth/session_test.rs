use super::*;

fn session(expires_at: i64) -> Session {
    Session {
        user_id: Uuid::nil(),
        email: Some("ada@example.com".to_owned()),
        access_token: "access".to_owned(),
        refresh_token: "refresh".to_owned(),
        expires_at,
    }
}

#[test]
fn session_is_expired_past_expiry() {
    assert!(session(100).is_expired(200, 0));
}

#[test]
fn session_is_expired_within_leeway() {
    assert!(session(1_000).is_expired(950, 60));
    assert!(!session(1_000).is_expired(900, 60));
}

#[test]
fn display_identity_prefers_email() {
    assert_eq!(session(0).display_identity(), "ada@example.com");
}

#[test]
fn display_identity_falls_back_to_user_id() {
    let mut s = session(0);
    s.email = None;
    assert_eq!(s.display_identity(), Uuid::nil().to_string());
}

#[test]
fn auth_event_session_for_session_bearing_variants() {
    let s = session(0);
    assert_eq!(AuthEvent::SignedIn(s.clone()).session(), Some(&s));
    assert_eq!(AuthEvent::TokenRefreshed(s.clone()).session(), Some(&s));
    assert_eq!(AuthEvent::Other(Some(s.clone())).session(), Some(&s));
}

#[test]
fn auth_event_session_absent_for_sign_out() {
    assert!(AuthEvent::SignedOut.session().is_none());
    assert!(AuthEvent::Other(None).session().is_none());
}

#[test]
fn auth_event_labels() {
    assert_eq!(AuthEvent::SignedOut.label(), "signed_out");
    assert_eq!(AuthEvent::Other(None).label(), "other");
}
