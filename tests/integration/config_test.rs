//! Configuration loading tests

use price_monitor::config::Config;
use std::path::Path;

#[test]
fn test_example_config_loads() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config.toml.example");
    let config = Config::load(path).unwrap();

    let registry = config.monitor.registry().unwrap();
    assert_eq!(registry.len(), 13);
    assert_eq!(registry.lookup("ADA-USD"), 1.0);
    assert_eq!(registry.lookup("IETH-ADA"), 2.0);
    assert!(config.validator.base_uri.is_none());
}

#[test]
fn test_env_style_override_builds_endpoints() {
    let config = Config::embedded()
        .unwrap()
        .with_base_uri_override(Some("wss://validator.example/ws/".to_string()));

    let endpoints = config.validator.endpoints().unwrap();
    assert_eq!(endpoints.monitor_uri, "wss://validator.example/ws/price_monitor/");
    assert_eq!(endpoints.update_uri, "wss://validator.example/ws/validate/");
}
