// ABOUTME: Tests for loading client configuration from TOML files on disk

use std::io::Write;

use market_alerts::config::AlertConfig;
use market_alerts::error::AlertError;
use pretty_assertions::assert_eq;
use tempfile::{NamedTempFile, TempDir};

#[test]
fn test_load_reads_explicit_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
base_url = "https://market.example.com"
user_id = "64ab12"
session_cookie = "connect.sid=s%3Aabc"
poll_interval_ms = 2500
request_timeout_ms = 8000
sound_enabled = false
"#
    )
    .unwrap();

    let config = AlertConfig::load(Some(file.path())).unwrap();
    assert_eq!(config.base_url, "https://market.example.com");
    assert_eq!(config.user_id.as_deref(), Some("64ab12"));
    assert_eq!(config.poll_interval_ms, 2500);
    assert_eq!(config.request_timeout_ms, Some(8000));
    assert!(!config.sound_enabled);
    assert_eq!(config.max_visible, 3);
    assert!(config.validate().is_ok());
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");
    let result = AlertConfig::load(Some(&path));
    assert!(matches!(result, Err(AlertError::Config(_))));
}

#[test]
fn test_invalid_toml_is_reported() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "poll_interval_ms = \"soon\"").unwrap();

    let result = AlertConfig::load(Some(file.path()));
    assert!(matches!(result, Err(AlertError::ConfigParse(_))));
}

#[test]
fn test_endpoints_resolve_against_base_url() {
    let config = AlertConfig {
        base_url: "https://market.example.com".into(),
        unread_count_path: "/api/users/{user_id}/notifications/unread".into(),
        ..AlertConfig::default()
    };

    let url = config.endpoint_url(&config.unread_count_path, "64ab12").unwrap();
    assert_eq!(url.as_str(), "https://market.example.com/api/users/64ab12/notifications/unread");
}
