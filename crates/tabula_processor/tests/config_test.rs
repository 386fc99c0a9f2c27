//! Tests for processor configuration loading.

use std::collections::HashMap;
use tabula_error::ConfigOrigin;
use tabula_processor::{ProcessOptions, ProcessorConfig};

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn test_defaults() {
    let config = ProcessorConfig::default();
    assert!(*config.encode_output());
    assert!(!*config.expose_hidden_fields());
    assert!(*config.case_insensitive_search());
    assert_eq!(*config.default_page_length(), None);
}

#[test]
fn test_empty_toml_uses_defaults() {
    let config = ProcessorConfig::from_toml_str("").unwrap();
    assert_eq!(config, ProcessorConfig::default());
}

#[test]
fn test_toml_overrides() {
    let config = ProcessorConfig::from_toml_str(
        r#"
encode_output = false
expose_hidden_fields = true
case_insensitive_search = false
default_page_length = 25
"#,
    )
    .unwrap();

    assert!(!*config.encode_output());
    assert!(*config.expose_hidden_fields());
    assert!(!*config.case_insensitive_search());
    assert_eq!(*config.default_page_length(), Some(25));
}

#[test]
fn test_toml_rejects_zero_page_length() {
    let err = ProcessorConfig::from_toml_str("default_page_length = 0").unwrap_err();
    assert_eq!(err.origin, ConfigOrigin::Toml);
    assert_eq!(err.key.as_deref(), Some("default_page_length"));
}

#[test]
fn test_toml_rejects_wrong_types() {
    assert!(ProcessorConfig::from_toml_str("encode_output = \"maybe\"").is_err());
    assert!(ProcessorConfig::from_toml_str("default_page_length = -3").is_err());
}

#[test]
fn test_from_file() {
    let path = std::env::temp_dir().join(format!("tabula_config_test_{}.toml", std::process::id()));
    std::fs::write(&path, "default_page_length = 50\n").unwrap();

    let config = ProcessorConfig::from_file(&path);
    std::fs::remove_file(&path).unwrap();

    assert_eq!(*config.unwrap().default_page_length(), Some(50));
}

#[test]
fn test_from_missing_file() {
    let err = ProcessorConfig::from_file("/nonexistent/tabula.toml").unwrap_err();
    assert_eq!(err.origin, ConfigOrigin::File);
    assert!(err.message.contains("Failed to read"));
}

#[test]
fn test_lookup_defaults_when_unset() {
    let config = ProcessorConfig::from_lookup(lookup(&[])).unwrap();
    assert_eq!(config, ProcessorConfig::default());
}

#[test]
fn test_lookup_overrides() {
    let config = ProcessorConfig::from_lookup(lookup(&[
        ("TABULA_ENCODE_OUTPUT", "off"),
        ("TABULA_EXPOSE_HIDDEN_FIELDS", "YES"),
        ("TABULA_CASE_INSENSITIVE_SEARCH", "0"),
        ("TABULA_DEFAULT_PAGE_LENGTH", " 15 "),
    ]))
    .unwrap();

    assert!(!*config.encode_output());
    assert!(*config.expose_hidden_fields());
    assert!(!*config.case_insensitive_search());
    assert_eq!(*config.default_page_length(), Some(15));
}

#[test]
fn test_lookup_rejects_invalid_values() {
    let err = ProcessorConfig::from_lookup(lookup(&[("TABULA_ENCODE_OUTPUT", "sometimes")]))
        .unwrap_err();
    assert_eq!(err.origin, ConfigOrigin::Environment);
    assert_eq!(err.key.as_deref(), Some("TABULA_ENCODE_OUTPUT"));

    let err = ProcessorConfig::from_lookup(lookup(&[("TABULA_DEFAULT_PAGE_LENGTH", "ten")]))
        .unwrap_err();
    assert_eq!(err.key.as_deref(), Some("TABULA_DEFAULT_PAGE_LENGTH"));
    assert!(ProcessorConfig::from_lookup(lookup(&[("TABULA_DEFAULT_PAGE_LENGTH", "0")])).is_err());
}

#[test]
fn test_default_options_follow_config() {
    let config = ProcessorConfig::default()
        .with_encode_output(false)
        .with_expose_hidden_fields(true);

    let options = config.default_options();
    assert!(!*options.encode_output());
    assert!(*options.expose_hidden_fields());
    assert!(options.eager_load().is_empty());
    assert!(options.base_query().is_none());
}

#[test]
fn test_default_options_encode() {
    let options = ProcessOptions::default();
    assert!(*options.encode_output());
    assert!(!*options.expose_hidden_fields());
}
