use super::*;

fn reply(status: u16, body: &str) -> HttpReply {
    HttpReply { status, body: body.to_owned() }
}

#[test]
fn reply_ok_for_2xx_only() {
    assert!(reply(200, "").ok());
    assert!(reply(204, "").ok());
    assert!(!reply(400, "").ok());
    assert!(!reply(302, "").ok());
}

#[test]
fn error_message_prefers_msg_field() {
    assert_eq!(error_message(&reply(400, r#"{"msg":"Invalid code","error":"x"}"#)), "Invalid code");
}

#[test]
fn error_message_reads_message_field() {
    assert_eq!(error_message(&reply(400, r#"{"message":"Team is full"}"#)), "Team is full");
}

#[test]
fn error_message_reads_error_description() {
    assert_eq!(
        error_message(&reply(400, r#"{"error":"invalid_grant","error_description":"Refresh token revoked"}"#)),
        "Refresh token revoked"
    );
}

#[test]
fn error_message_falls_back_to_raw_body() {
    assert_eq!(error_message(&reply(502, "bad gateway")), "bad gateway");
}

#[test]
fn error_message_falls_back_to_status() {
    assert_eq!(error_message(&reply(500, "  ")), "request failed: 500");
}
