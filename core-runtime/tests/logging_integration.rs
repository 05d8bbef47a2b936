//! Integration tests for logging system

use bridge_traits::LogLevel;
use core_runtime::logging::{init_logging, redact_url_key, LogFormat, LoggingConfig};

#[test]
fn test_logging_configuration() {
    let config = LoggingConfig::default()
        .with_format(LogFormat::Compact)
        .with_level(LogLevel::Warn)
        .with_spans(true);

    assert_eq!(config.format, LogFormat::Compact);
    assert_eq!(config.level, LogLevel::Warn);
    assert!(config.enable_spans);
}

#[test]
fn test_init_logging_only_once() {
    let config = LoggingConfig::default().with_format(LogFormat::Compact);

    assert!(init_logging(config.clone()).is_ok());
    let second = init_logging(config);
    assert!(second.is_err());
    assert!(second
        .unwrap_err()
        .to_string()
        .contains("Failed to initialize logging"));

    tracing::info!(archive_id = "a-1", "logging initialized");
}

#[test]
fn test_invalid_filter_is_rejected_before_install() {
    let config = LoggingConfig::default().with_filter("core_sync=loudest");
    let err = init_logging(config).unwrap_err();

    assert!(err.to_string().contains("Invalid log filter"));
}

#[test]
fn test_api_key_never_reaches_logs() {
    let key = "AIzaSyExampleKey";

    let url = format!(
        "https://www.googleapis.com/youtube/v3/playlists?part=id,snippet&id=PL1&key={}",
        key
    );
    let redacted = redact_url_key(&url);
    assert!(!redacted.contains(key));
    assert!(redacted.ends_with("key=[REDACTED]"));
}

#[test]
fn test_url_redaction_keeps_non_ascii_query_values() {
    let url = "https://www.googleapis.com/youtube/v3/videos?id=é1&key=ÄIzaSy&part=snippet";
    assert_eq!(
        redact_url_key(url),
        "https://www.googleapis.com/youtube/v3/videos?id=é1&key=[REDACTED]&part=snippet"
    );
}
