use std::collections::HashMap;

use askai::config::{CONNECT_TIMEOUT_VAR, ClientTimeouts, REQUEST_TIMEOUT_VAR};

use super::*;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
    move |key| map.get(key).cloned()
}

#[test]
fn config_comes_from_env_without_flag() {
    let cfg = build_config(
        None,
        env_from(&[(BASE_URL_VAR, "http://env.test/"), (REQUEST_TIMEOUT_VAR, "5"), (CONNECT_TIMEOUT_VAR, "2")]),
    )
    .unwrap();
    assert_eq!(cfg.base_url, "http://env.test");
    assert_eq!(cfg.timeouts, ClientTimeouts { request_secs: 5, connect_secs: 2 });
}

#[test]
fn base_url_flag_overrides_env_and_keeps_env_timeouts() {
    let cfg = build_config(
        Some("http://flag.test"),
        env_from(&[(BASE_URL_VAR, "http://env.test"), (REQUEST_TIMEOUT_VAR, "5")]),
    )
    .unwrap();
    assert_eq!(cfg.base_url, "http://flag.test");
    assert_eq!(cfg.timeouts.request_secs, 5);
    assert_eq!(cfg.timeouts.connect_secs, ClientTimeouts::default().connect_secs);
}

#[test]
fn zero_timeout_in_env_uses_default() {
    let cfg = build_config(Some("http://flag.test"), env_from(&[(CONNECT_TIMEOUT_VAR, "0")])).unwrap();
    assert_eq!(cfg.timeouts, ClientTimeouts::default());
}

#[test]
fn missing_base_url_is_a_config_error() {
    let err = build_config(None, env_from(&[])).unwrap_err();
    assert!(matches!(err, ApiError::Config(_)));
}
