use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("unknown").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "PRICEMATCH_ENV"));
}

#[test]
fn build_app_config_uses_defaults_when_env_is_empty() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.base_url, "http://localhost:5000");
    assert_eq!(cfg.sources_path.to_str(), Some("./config/sources.yaml"));
    assert_eq!(cfg.save_path, "/");
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.user_agent, "pricematch/0.1 (price-comparison)");
    assert_eq!(cfg.markup_percent, Decimal::ZERO);
}

#[test]
fn build_app_config_reads_overrides() {
    let mut map = HashMap::new();
    map.insert("PRICEMATCH_ENV", "production");
    map.insert("PRICEMATCH_BASE_URL", "https://matcher.example.co.za");
    map.insert("PRICEMATCH_SAVE_PATH", "/submit");
    map.insert("PRICEMATCH_REQUEST_TIMEOUT_SECS", "5");
    map.insert("PRICEMATCH_MARKUP_PERCENT", "12.5");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Production);
    assert_eq!(cfg.base_url, "https://matcher.example.co.za");
    assert_eq!(cfg.save_path, "/submit");
    assert_eq!(cfg.request_timeout_secs, 5);
    assert_eq!(cfg.markup_percent, Decimal::new(125, 1));
}

#[test]
fn build_app_config_rejects_base_url_without_scheme() {
    let mut map = HashMap::new();
    map.insert("PRICEMATCH_BASE_URL", "localhost:5000");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PRICEMATCH_BASE_URL"),
        "expected InvalidEnvVar(PRICEMATCH_BASE_URL), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_relative_save_path() {
    let mut map = HashMap::new();
    map.insert("PRICEMATCH_SAVE_PATH", "submit");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PRICEMATCH_SAVE_PATH"),
        "expected InvalidEnvVar(PRICEMATCH_SAVE_PATH), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_invalid_timeout() {
    let mut map = HashMap::new();
    map.insert("PRICEMATCH_REQUEST_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PRICEMATCH_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(PRICEMATCH_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_invalid_markup() {
    let mut map = HashMap::new();
    map.insert("PRICEMATCH_MARKUP_PERCENT", "ten");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PRICEMATCH_MARKUP_PERCENT"),
        "expected InvalidEnvVar(PRICEMATCH_MARKUP_PERCENT), got: {result:?}"
    );
}
