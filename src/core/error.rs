//! Error types for scheduler operations.

use thiserror::Error;

use crate::util::serde::TaskId;

/// Errors produced synchronously by queue operations.
///
/// Handler failures and timeouts are never reported through this type; they
/// are absorbed into the task record and surfaced via [`crate::core::Task`].
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Submission carried no handler.
    #[error("handler must be a function")]
    InvalidHandler,
    /// Submission priority is outside the fixed range.
    #[error("priority out of range")]
    PriorityOutOfRange {
        /// Rejected value.
        value: i64,
    },
    /// Submission max-retries is negative.
    #[error("max-retries must be non-negative integer")]
    InvalidMaxRetries {
        /// Rejected value.
        value: i64,
    },
    /// Submission timeout override is zero.
    #[error("timeout must be greater than 0")]
    InvalidTimeout,
    /// Queue has been disposed and accepts no more work.
    #[error("queue disposed")]
    Disposed,
    /// No task with this identifier is known to the queue.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
    /// Waiting for a task to finish exceeded the caller's deadline.
    #[error("timed out waiting for task {0}")]
    WaitTimeout(TaskId),
    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Application-facing result using anyhow, returned by task handlers.
pub type AppResult<T> = Result<T, anyhow::Error>;
