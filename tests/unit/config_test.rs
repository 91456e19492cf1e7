//! Tests for configuration validation

use prometheus_job_queue::config::queue::{
    ENV_BACKOFF_BASE_MS, ENV_DEFAULT_MAX_RETRIES, ENV_DEFAULT_TIMEOUT_MS, ENV_MAX_CONCURRENCY,
};
use prometheus_job_queue::config::QueueConfig;

fn valid() -> QueueConfig {
    QueueConfig {
        max_concurrency: 4,
        default_timeout_ms: 5_000,
        default_max_retries: 2,
        backoff_base_ms: 250,
    }
}

#[test]
fn test_queue_config_validation() {
    assert!(valid().validate().is_ok());
}

#[test]
fn test_queue_config_invalid_concurrency() {
    let invalid = QueueConfig {
        max_concurrency: 0,
        ..valid()
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_queue_config_invalid_timeout() {
    let invalid = QueueConfig {
        default_timeout_ms: 0,
        ..valid()
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_queue_config_invalid_backoff() {
    let invalid = QueueConfig {
        backoff_base_ms: 0,
        ..valid()
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_zero_retries_is_allowed() {
    let cfg = QueueConfig {
        default_max_retries: 0,
        ..valid()
    };
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_from_json() {
    let json = r#"{
        "max_concurrency": 8,
        "default_timeout_ms": 1000,
        "default_max_retries": 5,
        "backoff_base_ms": 50
    }"#;
    let cfg = QueueConfig::from_json_str(json).unwrap();
    assert_eq!(cfg.max_concurrency, 8);
    assert_eq!(cfg.default_timeout().as_millis(), 1000);
    assert_eq!(cfg.default_max_retries, 5);
    assert_eq!(cfg.backoff_base().as_millis(), 50);
}

#[test]
fn test_from_json_rejects_invalid() {
    assert!(QueueConfig::from_json_str(r#"{"max_concurrency": 0}"#).is_err());
    assert!(QueueConfig::from_json_str("not json").is_err());
}

#[test]
fn test_json_roundtrip_keeps_fields() {
    let cfg = valid();
    let json = serde_json::to_string(&cfg).unwrap();
    assert_eq!(QueueConfig::from_json_str(&json).unwrap(), cfg);
}

#[test]
fn test_from_env_overrides() {
    std::env::set_var(ENV_MAX_CONCURRENCY, "6");
    std::env::set_var(ENV_DEFAULT_TIMEOUT_MS, "1500");
    std::env::set_var(ENV_DEFAULT_MAX_RETRIES, "0");
    std::env::set_var(ENV_BACKOFF_BASE_MS, " 20 ");

    let cfg = QueueConfig::from_env().unwrap();
    assert_eq!(cfg.max_concurrency, 6);
    assert_eq!(cfg.default_timeout_ms, 1500);
    assert_eq!(cfg.default_max_retries, 0);
    assert_eq!(cfg.backoff_base_ms, 20);

    std::env::set_var(ENV_DEFAULT_MAX_RETRIES, "-1");
    let err = QueueConfig::from_env().unwrap_err();
    assert!(err.contains(ENV_DEFAULT_MAX_RETRIES));

    std::env::set_var(ENV_DEFAULT_MAX_RETRIES, "1");
    std::env::set_var(ENV_MAX_CONCURRENCY, "0");
    assert!(QueueConfig::from_env().is_err());

    for key in [
        ENV_MAX_CONCURRENCY,
        ENV_DEFAULT_TIMEOUT_MS,
        ENV_DEFAULT_MAX_RETRIES,
        ENV_BACKOFF_BASE_MS,
    ] {
        std::env::remove_var(key);
    }
    assert_eq!(QueueConfig::from_env().unwrap(), QueueConfig::default());
}
