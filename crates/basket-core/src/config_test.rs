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
fn build_app_config_defaults_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.log_level, "info");
    assert!(cfg.rules_path.is_none());
    assert!(cfg.popular_items_path.is_none());
    assert!((cfg.weight_tolerance_g - 5.0).abs() < f64::EPSILON);
    assert_eq!(cfg.savings_threshold, Decimal::new(1, 2));
}

#[test]
fn build_app_config_reads_overrides() {
    let mut map = HashMap::new();
    map.insert("BASKET_LOG_LEVEL", "debug");
    map.insert("BASKET_RULES_PATH", "/etc/basket/normalization.yaml");
    map.insert("BASKET_POPULAR_ITEMS_PATH", "/etc/basket/popular.yaml");
    map.insert("BASKET_WEIGHT_TOLERANCE_G", "2.5");
    map.insert("BASKET_SAVINGS_THRESHOLD", "0.05");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.log_level, "debug");
    assert_eq!(
        cfg.rules_path,
        Some(PathBuf::from("/etc/basket/normalization.yaml"))
    );
    assert_eq!(
        cfg.popular_items_path,
        Some(PathBuf::from("/etc/basket/popular.yaml"))
    );
    assert!((cfg.weight_tolerance_g - 2.5).abs() < f64::EPSILON);
    assert_eq!(cfg.savings_threshold, Decimal::new(5, 2));
}

#[test]
fn build_app_config_blank_path_is_none() {
    let mut map = HashMap::new();
    map.insert("BASKET_RULES_PATH", "   ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.rules_path.is_none());
}

#[test]
fn build_app_config_ignores_unrelated_vars() {
    let mut map = HashMap::new();
    map.insert("BASKET_ENV", "staging");
    map.insert("BASKET_LOG_LEVEL", "warn");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.log_level, "warn");
    assert!(cfg.rules_path.is_none());
}

#[test]
fn build_app_config_fails_with_invalid_tolerance() {
    let mut map = HashMap::new();
    map.insert("BASKET_WEIGHT_TOLERANCE_G", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "BASKET_WEIGHT_TOLERANCE_G"),
        "expected InvalidEnvVar(BASKET_WEIGHT_TOLERANCE_G), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_with_negative_tolerance() {
    let mut map = HashMap::new();
    map.insert("BASKET_WEIGHT_TOLERANCE_G", "-1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "BASKET_WEIGHT_TOLERANCE_G"),
        "expected InvalidEnvVar(BASKET_WEIGHT_TOLERANCE_G), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_with_invalid_savings_threshold() {
    let mut map = HashMap::new();
    map.insert("BASKET_SAVINGS_THRESHOLD", "a penny");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "BASKET_SAVINGS_THRESHOLD"),
        "expected InvalidEnvVar(BASKET_SAVINGS_THRESHOLD), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_with_negative_savings_threshold() {
    let mut map = HashMap::new();
    map.insert("BASKET_SAVINGS_THRESHOLD", "-0.01");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "BASKET_SAVINGS_THRESHOLD"),
        "expected InvalidEnvVar(BASKET_SAVINGS_THRESHOLD), got: {result:?}"
    );
}
