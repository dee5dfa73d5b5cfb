use futures::executor::block_on;

use super::*;
use crate::auth::testing::session_for;

const TEAM_ROW: &str = r#"{"id":"00000000-0000-0000-0000-0000000000aa","name":"Segfault Society","code":"SEG123"}"#;

fn team_id() -> Uuid {
    Uuid::parse_str("00000000-0000-0000-0000-0000000000aa").unwrap()
}

// =============================================================================
// parse_reply
// =============================================================================

#[test]
fn parse_reply_bare_row() {
    let reply: Reply<Team> = parse_reply(TEAM_ROW).unwrap();
    let Reply::Success(Some(team)) = reply else {
        panic!("expected a team");
    };
    assert_eq!(team.id, team_id());
    assert_eq!(team.code.as_deref(), Some("SEG123"));
}

#[test]
fn parse_reply_array_takes_first_row() {
    let body = format!("[{TEAM_ROW}]");
    let reply: Reply<Team> = parse_reply(&body).unwrap();
    assert!(matches!(reply, Reply::Success(Some(team)) if team.name == "Segfault Society"));
}

#[test]
fn parse_reply_empty_array_and_null_are_none() {
    assert_eq!(parse_reply::<Team>("[]").unwrap(), Reply::Success(None));
    assert_eq!(parse_reply::<Team>("null").unwrap(), Reply::Success(None));
    assert_eq!(parse_reply::<Team>("").unwrap(), Reply::Success(None));
}

#[test]
fn parse_reply_failure_envelope_keeps_message_verbatim() {
    let reply = parse_reply::<TeamMembership>(r#"{"success":false,"message":"Team is full (max 3 members)"}"#).unwrap();
    assert_eq!(reply, Reply::Failure("Team is full (max 3 members)".to_owned()));
}

#[test]
fn parse_reply_failure_envelope_without_message() {
    let reply = parse_reply::<TeamMembership>(r#"{"success":false}"#).unwrap();
    assert_eq!(reply, Reply::Failure("request failed".to_owned()));
}

#[test]
fn parse_reply_success_envelope_with_data() {
    let body = r#"{"success":true,"data":{"team_id":"00000000-0000-0000-0000-0000000000aa","team_name":"Segfault Society"}}"#;
    let reply = parse_reply::<TeamMembership>(body).unwrap();
    let Reply::Success(Some(membership)) = reply else {
        panic!("expected membership");
    };
    assert_eq!(membership.team_id, team_id());
    assert_eq!(membership.team_name.as_deref(), Some("Segfault Society"));
}

#[test]
fn parse_reply_success_envelope_with_flat_payload() {
    let body = r#"{"success":true,"team_id":"00000000-0000-0000-0000-0000000000aa"}"#;
    let reply = parse_reply::<TeamMembership>(body).unwrap();
    assert!(matches!(reply, Reply::Success(Some(m)) if m.team_id == team_id()));
}

#[test]
fn parse_reply_success_envelope_with_only_message() {
    let body = r#"{"success":true,"message":"Successfully joined team"}"#;
    assert_eq!(parse_reply::<TeamMembership>(body).unwrap(), Reply::Success(None));
}

#[test]
fn parse_reply_success_envelope_with_unreadable_data_is_still_success() {
    let body = r#"{"success":true,"data":{"unexpected":1}}"#;
    assert_eq!(parse_reply::<TeamMembership>(body).unwrap(), Reply::Success(None));
}

#[test]
fn into_result_message_only_success_is_ok() {
    let reply = HttpReply { status: 200, body: r#"{"success":true,"message":"Successfully joined team"}"#.to_owned() };
    assert_eq!(into_result::<TeamMembership>(&reply), Ok(None));
}

#[test]
fn parse_reply_error_object_without_flag() {
    let reply = parse_reply::<Team>(r#"{"error":"Invalid team code"}"#).unwrap();
    assert_eq!(reply, Reply::Failure("Invalid team code".to_owned()));
}

#[test]
fn parse_reply_unreadable_shapes_are_malformed() {
    assert!(matches!(parse_reply::<Team>("42"), Err(RpcError::Malformed(_))));
    assert!(matches!(parse_reply::<Team>(r#"{"unexpected":true}"#), Err(RpcError::Malformed(_))));
    assert!(matches!(parse_reply::<Team>("not json"), Err(RpcError::Malformed(_))));
}

// =============================================================================
// into_result
// =============================================================================

#[test]
fn into_result_http_error_surfaces_remote_message() {
    let reply = HttpReply { status: 400, body: r#"{"message":"duplicate key value violates unique constraint"}"#.to_owned() };
    assert_eq!(
        into_result::<Team>(&reply),
        Err(RpcError::Remote("duplicate key value violates unique constraint".to_owned()))
    );
}

#[test]
fn into_result_failure_envelope_is_error() {
    let reply = HttpReply { status: 200, body: r#"{"success":false,"error":"Already in a team"}"#.to_owned() };
    assert_eq!(into_result::<Team>(&reply), Err(RpcError::Remote("Already in a team".to_owned())));
}

// =============================================================================
// TeamsApi
// =============================================================================

#[test]
fn procedure_url_targets_rpc_path() {
    let api = TeamsApi::new(PublicConfig::new("https://festival.supabase.co", "k"), &session_for("t@example.com"));
    assert_eq!(
        api.procedure_url("join_team_by_code"),
        "https://festival.supabase.co/rest/v1/rpc/join_team_by_code"
    );
}

#[test]
fn unconfigured_backend_rejects_before_sending() {
    let api = TeamsApi::new(PublicConfig::default(), &session_for("t@example.com"));
    assert_eq!(block_on(api.join_team_by_code("ABC", Uuid::nil())), Err(RpcError::NotConfigured));
}

#[test]
fn remote_error_displays_verbatim() {
    assert_eq!(RpcError::Remote("Code expired".to_owned()).to_string(), "Code expired");
}
