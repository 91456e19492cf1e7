//! Tests for error types

use prometheus_job_queue::core::SchedulerError;

#[test]
fn test_validation_messages() {
    assert_eq!(
        SchedulerError::InvalidHandler.to_string(),
        "handler must be a function"
    );
    assert_eq!(
        SchedulerError::PriorityOutOfRange { value: 9 }.to_string(),
        "priority out of range"
    );
    assert_eq!(
        SchedulerError::InvalidMaxRetries { value: -2 }.to_string(),
        "max-retries must be non-negative integer"
    );
    assert_eq!(
        SchedulerError::InvalidTimeout.to_string(),
        "timeout must be greater than 0"
    );
}

#[test]
fn test_disposed_error() {
    let err = SchedulerError::Disposed;
    assert_eq!(format!("{}", err), "queue disposed");
}

#[test]
fn test_lookup_errors() {
    assert_eq!(SchedulerError::TaskNotFound(7).to_string(), "task not found: 7");
    assert_eq!(
        SchedulerError::WaitTimeout(7).to_string(),
        "timed out waiting for task 7"
    );
}

#[test]
fn test_invalid_config_error() {
    let err = SchedulerError::InvalidConfig("max_concurrency must be greater than 0".to_string());
    assert_eq!(
        format!("{}", err),
        "invalid configuration: max_concurrency must be greater than 0"
    );
}

#[test]
fn test_converts_into_anyhow() {
    fn fallible() -> prometheus_job_queue::core::AppResult<()> {
        Err(SchedulerError::Disposed.into())
    }
    let err = fallible().unwrap_err();
    assert!(err.downcast_ref::<SchedulerError>().is_some());
}
