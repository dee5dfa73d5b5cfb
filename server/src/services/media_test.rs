use super::*;

fn config(folder: Option<&str>) -> CloudinaryConfig {
    CloudinaryConfig {
        cloud_name: "demo".into(),
        api_key: "key".into(),
        api_secret: "s3cr3t".into(),
        folder: folder.map(str::to_owned),
    }
}

#[test]
fn upload_url_targets_cloud_image_endpoint() {
    assert_eq!(config(None).upload_url(), "https://api.cloudinary.com/v1_1/demo/image/upload");
}

#[test]
fn debug_redacts_secret() {
    let rendered = format!("{:?}", config(None));
    assert!(!rendered.contains("s3cr3t"));
    assert!(rendered.contains("<redacted>"));
}

#[test]
fn sign_params_is_deterministic_hex() {
    let sig = sign_params(&[("timestamp", "1315060510".into())], "abcd");
    assert_eq!(sig.len(), 64);
    assert_eq!(sig, sign_params(&[("timestamp", "1315060510".into())], "abcd"));
    assert_ne!(sig, sign_params(&[("timestamp", "1315060510".into())], "abce"));
}

#[test]
fn sign_params_is_order_independent() {
    let a = sign_params(&[("timestamp", "1".into()), ("folder", "f".into())], "s");
    let b = sign_params(&[("folder", "f".into()), ("timestamp", "1".into())], "s");
    assert_eq!(a, b);
}

#[test]
fn sign_params_hashes_sorted_string_plus_secret() {
    let mut hasher = Sha256::new();
    hasher.update(b"folder=f&timestamp=1s");
    let expected: String = hasher.finalize().iter().map(|b| format!("{b:02x}")).collect();
    assert_eq!(sign_params(&[("timestamp", "1".into()), ("folder", "f".into())], "s"), expected);
}

#[test]
fn signed_params_include_folder_only_when_set() {
    assert_eq!(signed_params(&config(None), 42), vec![("timestamp", "42".to_owned())]);
    assert_eq!(
        signed_params(&config(Some("festival")), 42),
        vec![("timestamp", "42".to_owned()), ("folder", "festival".to_owned())]
    );
}

#[test]
fn parse_upload_response_reads_metadata() {
    let body = r#"{
        "asset_id": "ignored",
        "public_id": "festival/abc",
        "width": 800,
        "height": 600,
        "format": "png",
        "resource_type": "image",
        "created_at": "2026-03-01T10:00:00Z",
        "bytes": 12345,
        "secure_url": "https://res.cloudinary.com/demo/image/upload/festival/abc.png"
    }"#;
    let media = parse_upload_response(200, body).unwrap();
    assert_eq!(media.public_id, "festival/abc");
    assert_eq!(media.width, 800);
    assert_eq!(media.bytes, 12345);
}

#[test]
fn parse_upload_response_surfaces_host_message() {
    let err = parse_upload_response(400, r#"{"error":{"message":"Invalid Signature"}}"#).unwrap_err();
    match err {
        MediaError::Rejected { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Invalid Signature");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn parse_upload_response_falls_back_to_raw_body() {
    let err = parse_upload_response(502, "bad gateway").unwrap_err();
    assert!(matches!(err, MediaError::Rejected { status: 502, ref message } if message == "bad gateway"));
}

#[test]
fn parse_upload_response_rejects_incomplete_success() {
    let err = parse_upload_response(200, r#"{"public_id":"x"}"#).unwrap_err();
    assert!(matches!(err, MediaError::Malformed(_)));
}
