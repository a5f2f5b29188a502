#![allow(clippy::unwrap_used)]
// Loading and saving config files on disk.

use std::path::PathBuf;

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use crux_config::{Config, ConfigError, Defaults, load_config_from, save_config_to};
use crux_core::FormFactor;

#[test]
fn test_load_reads_toml_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
api_key_env = "PAGESPEED_KEY"
endpoint = "http://localhost:8080/v1/records:queryRecord"
form_factor = "TABLET"
ca_cert = "/opt/ca.pem"

[defaults]
output = "json"
page_size = 10
"#,
    )
    .unwrap();

    let cfg = load_config_from(&path).unwrap();
    assert_eq!(cfg.api_key_env.as_deref(), Some("PAGESPEED_KEY"));
    assert_eq!(
        cfg.endpoint.as_deref(),
        Some("http://localhost:8080/v1/records:queryRecord")
    );
    assert_eq!(cfg.form_factor, Some(FormFactor::Tablet));
    assert_eq!(cfg.ca_cert, Some(PathBuf::from("/opt/ca.pem")));
    assert_eq!(cfg.defaults.output, "json");
    assert_eq!(cfg.defaults.page_size, 10);
    // Unset fields keep their defaults.
    assert_eq!(cfg.defaults.color, "auto");
}

#[test]
fn test_invalid_toml_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "defaults = [not toml").unwrap();
    assert!(load_config_from(&path).is_err());
}

#[test]
fn test_mistyped_field_does_not_drop_the_key() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
api_key = "real-key"

[defaults]
page_size = "ten"
"#,
    )
    .unwrap();

    let err = load_config_from(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Figment(_)), "{err}");
}

#[test]
fn test_save_then_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");
    let cfg = Config {
        api_key_env: Some("MY_KEY".into()),
        form_factor: Some(FormFactor::Desktop),
        defaults: Defaults {
            timeout: 12,
            ..Defaults::default()
        },
        ..Config::default()
    };

    save_config_to(&cfg, &path).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("form_factor = \"DESKTOP\""), "{text}");

    let loaded = load_config_from(&path).unwrap();
    assert_eq!(loaded.api_key_env.as_deref(), Some("MY_KEY"));
    assert_eq!(loaded.form_factor, Some(FormFactor::Desktop));
    assert_eq!(loaded.defaults.timeout, 12);
}
