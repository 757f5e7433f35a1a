use std::collections::HashMap;
use std::time::Duration;

use voyager::config::{BackendKind, ConfigError, DemoConfig, DEFAULT_BASE_URL};
use voyager::render::Presentation;

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_defaults() {
    let config = DemoConfig::from_lookup(lookup(&[])).expect("defaults are valid");
    assert_eq!(config, DemoConfig::default());
    assert_eq!(config.backend, BackendKind::Local);
    assert_eq!(config.base_url, DEFAULT_BASE_URL);
    assert_eq!(config.location, "Dubai");
    assert_eq!(config.presentation, Presentation::Html);
    assert_eq!(config.request_timeout(), None);
}

#[test]
fn test_environment_overrides() {
    let config = DemoConfig::from_lookup(lookup(&[
        ("VOYAGER_BACKEND", "HTTP"),
        ("VOYAGER_BASE_URL", " http://agent.local:9000/ "),
        ("VOYAGER_LOCATION", "Abu Dhabi"),
        ("VOYAGER_PRESENTATION", "json"),
        ("VOYAGER_TIMEOUT_MS", "2500"),
    ]))
    .expect("valid environment");

    assert_eq!(config.backend, BackendKind::Http);
    assert_eq!(config.base_url, "http://agent.local:9000/");
    assert_eq!(config.location, "Abu Dhabi");
    assert_eq!(config.presentation, Presentation::JsonDump);
    assert_eq!(config.request_timeout(), Some(Duration::from_millis(2500)));

    let controller = config.controller();
    assert_eq!(controller.presentation, Presentation::JsonDump);
    assert_eq!(controller.request_timeout, Some(Duration::from_millis(2500)));
}

#[test]
fn test_invalid_values_are_rejected() {
    let err = DemoConfig::from_lookup(lookup(&[("VOYAGER_PRESENTATION", "xml")])).unwrap_err();
    assert_eq!(
        err,
        ConfigError::Invalid {
            key: "presentation".to_string(),
            value: "xml".to_string()
        }
    );

    let mut config = DemoConfig::default();
    assert!(config.set("timeout_ms", "soon").is_err());
    assert!(config.set("location", "   ").is_err());
    assert!(config.set("backend", "grpc").is_err());
    assert_eq!(config.set("colour", "blue"), Err(ConfigError::UnknownKey("colour".to_string())));

    // VERIFY: failed sets leave the config untouched
    assert_eq!(config, DemoConfig::default());
}

#[test]
fn test_timeout_can_be_disabled() {
    let mut config = DemoConfig::default();
    config.set("timeout_ms", "800").expect("valid");
    assert_eq!(config.request_timeout_ms, Some(800));

    for off in ["0", "none", ""] {
        config.set("timeout_ms", "800").expect("valid");
        config.set("timeout_ms", off).expect("valid");
        assert_eq!(config.request_timeout(), None, "{:?} disables the timeout", off);
    }
}

#[test]
fn test_presentation_spellings() {
    for text in ["json", "JSON", "json_dump", "json-dump"] {
        assert_eq!(text.parse::<Presentation>(), Ok(Presentation::JsonDump));
    }
    assert_eq!(" html ".parse::<Presentation>(), Ok(Presentation::Html));
    for text in ["tools", "tool_calls", "Tool-Calls"] {
        assert_eq!(text.parse::<Presentation>(), Ok(Presentation::ToolCalls));
    }
}
