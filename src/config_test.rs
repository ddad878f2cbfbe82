use super::*;
use std::collections::HashMap;

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn defaults_when_unset() {
    let config = AuthConfig::from_lookup(lookup(&[]));
    assert_eq!(config, AuthConfig::default());
    assert_eq!(config.base_url, "http://localhost:8088/api/v1/auth");
    assert_eq!(config.request_timeout, Duration::from_secs(30));
}

#[test]
fn base_url_override_trims_trailing_slash() {
    let config = AuthConfig::from_lookup(lookup(&[("AUTH_API_URL", "https://auth.example.com/api/v1/auth/")]));
    assert_eq!(config.base_url, "https://auth.example.com/api/v1/auth");
}

#[test]
fn blank_base_url_falls_back_to_default() {
    let config = AuthConfig::from_lookup(lookup(&[("AUTH_API_URL", "   ")]));
    assert_eq!(config.base_url, DEFAULT_BASE_URL);
}

#[test]
fn timeout_override_parses() {
    let config = AuthConfig::from_lookup(lookup(&[("AUTH_REQUEST_TIMEOUT_SECS", "5")]));
    assert_eq!(config.request_timeout, Duration::from_secs(5));
}

#[test]
fn invalid_or_zero_timeout_falls_back() {
    for raw in ["abc", "0", "-3", ""] {
        let config = AuthConfig::from_lookup(lookup(&[("AUTH_REQUEST_TIMEOUT_SECS", raw)]));
        assert_eq!(config.request_timeout, Duration::from_secs(30), "raw={raw:?}");
    }
}

#[test]
fn url_joins_path_with_single_slash() {
    let config = AuthConfig::default().with_base_url("http://h/api/");
    assert_eq!(config.url("/signin"), "http://h/api/signin");
    assert_eq!(config.url("profile"), "http://h/api/profile");
}
