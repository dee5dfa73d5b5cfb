use super::*;

#[test]
fn parse_upload_reply_success() {
    let body = r#"{"success":true,"data":{"secure_url":"https://res.example/a.webp","public_id":"festival/a",
        "width":10,"height":20,"format":"webp","resource_type":"image","created_at":"2026-01-01T00:00:00Z","bytes":99}}"#;
    let image = parse_upload_reply(200, body).unwrap();
    assert_eq!(image.secure_url, "https://res.example/a.webp");
    assert_eq!(image.bytes, 99);
}

#[test]
fn parse_upload_reply_error_message_verbatim() {
    let err = parse_upload_reply(400, r#"{"error":"Invalid file type. Only JPEG, PNG and WebP images are allowed."}"#)
        .unwrap_err();
    assert_eq!(err, "Invalid file type. Only JPEG, PNG and WebP images are allowed.");
}

#[test]
fn parse_upload_reply_unreadable_body() {
    assert_eq!(parse_upload_reply(502, "<html>").unwrap_err(), "upload failed: 502");
}
