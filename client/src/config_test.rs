use super::*;

#[test]
fn new_trims_trailing_slash_and_whitespace() {
    let config = PublicConfig::new(" https://abc.supabase.co/ ", " key ");
    assert_eq!(config.supabase_url, "https://abc.supabase.co");
    assert_eq!(config.supabase_anon_key, "key");
}

#[test]
fn is_configured_requires_both_values() {
    assert!(PublicConfig::new("https://abc.supabase.co", "key").is_configured());
    assert!(!PublicConfig::new("", "key").is_configured());
    assert!(!PublicConfig::new("https://abc.supabase.co", "").is_configured());
    assert!(!PublicConfig::default().is_configured());
}

#[test]
fn endpoint_joins_single_slash() {
    let config = PublicConfig::new("https://abc.supabase.co/", "key");
    assert_eq!(config.endpoint("/auth/v1/user"), "https://abc.supabase.co/auth/v1/user");
    assert_eq!(config.endpoint("rest/v1/rpc/create_team"), "https://abc.supabase.co/rest/v1/rpc/create_team");
}
