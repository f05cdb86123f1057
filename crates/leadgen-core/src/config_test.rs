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
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "LEADGEN_ENV"));
}

#[test]
fn build_app_config_uses_defaults_for_empty_environment() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).expect("defaults should be valid");

    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert!(cfg.places_api_key.is_none());
    assert_eq!(cfg.places_timeout_secs, 30);
    assert_eq!(cfg.places_max_results, 20);
    assert_eq!(cfg.fetch_timeout_secs, 5);
    assert_eq!(cfg.user_agent, DEFAULT_USER_AGENT);
    assert!(cfg.strip_country_prefix);
    assert_eq!(cfg.max_concurrent, 1);
    assert_eq!(cfg.inter_request_delay_ms, 500);
    assert_eq!(cfg.max_businesses, 50);
    assert_eq!(cfg.data_dir, PathBuf::from("./data"));
}

#[test]
fn build_app_config_reads_overrides() {
    let mut map = HashMap::new();
    map.insert("LEADGEN_ENV", "production");
    map.insert("GOOGLE_PLACES_API_KEY", "key-123");
    map.insert("LEADGEN_FETCH_TIMEOUT_SECS", "3");
    map.insert("LEADGEN_STRIP_COUNTRY_PREFIX", "false");
    map.insert("LEADGEN_MAX_CONCURRENT", "4");
    map.insert("LEADGEN_DATA_DIR", "/var/lib/leadgen");

    let cfg = build_app_config(lookup_from_map(&map)).expect("overrides should be valid");

    assert_eq!(cfg.env, Environment::Production);
    assert_eq!(cfg.places_api_key.as_deref(), Some("key-123"));
    assert_eq!(cfg.fetch_timeout_secs, 3);
    assert!(!cfg.strip_country_prefix);
    assert_eq!(cfg.max_concurrent, 4);
    assert_eq!(cfg.data_dir, PathBuf::from("/var/lib/leadgen"));
}

#[test]
fn blank_api_key_is_treated_as_absent() {
    let mut map = HashMap::new();
    map.insert("GOOGLE_PLACES_API_KEY", "   ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.places_api_key.is_none());
}

#[test]
fn build_app_config_rejects_zero_fetch_timeout() {
    let mut map = HashMap::new();
    map.insert("LEADGEN_FETCH_TIMEOUT_SECS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "LEADGEN_FETCH_TIMEOUT_SECS"),
        "expected InvalidEnvVar(LEADGEN_FETCH_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_non_numeric_delay() {
    let mut map = HashMap::new();
    map.insert("LEADGEN_INTER_REQUEST_DELAY_MS", "soon");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "LEADGEN_INTER_REQUEST_DELAY_MS"),
        "expected InvalidEnvVar(LEADGEN_INTER_REQUEST_DELAY_MS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_places_max_results_out_of_range() {
    let mut map = HashMap::new();
    map.insert("LEADGEN_PLACES_MAX_RESULTS", "50");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "LEADGEN_PLACES_MAX_RESULTS"),
        "expected InvalidEnvVar(LEADGEN_PLACES_MAX_RESULTS), got: {result:?}"
    );
}

#[test]
fn parse_bool_accepts_common_spellings() {
    assert!(parse_bool("X", "TRUE").unwrap());
    assert!(parse_bool("X", "1").unwrap());
    assert!(!parse_bool("X", "off").unwrap());
    assert!(parse_bool("X", "maybe").is_err());
}

#[test]
fn debug_output_redacts_api_key() {
    let mut map = HashMap::new();
    map.insert("GOOGLE_PLACES_API_KEY", "super-secret");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("super-secret"));
    assert!(rendered.contains("[redacted]"));
}
