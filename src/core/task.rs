//! Task records, lifecycle status, and per-submission options.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::SchedulerError;
use crate::util::clock::duration_to_ms;
use crate::util::serde::{Priority, TaskId};

/// Error message recorded when an attempt exceeds its timeout.
pub const TIMEOUT_ERROR: &str = "task timed out";

/// Status of a task in the queue lifecycle.
///
/// `TimedOut` is only observable as a terminal status: a timed-out attempt
/// with retries left is moved back to `Pending` in the same transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Waiting in the ready list or behind a backoff delay.
    Pending,
    /// An attempt is in flight.
    Running,
    /// Finished successfully; the result is stored on the task.
    Completed,
    /// Exhausted its attempts with a handler error.
    Failed,
    /// Exhausted its attempts with a timeout.
    TimedOut,
}

impl TaskStatus {
    /// Whether no further transition can happen from this status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::TimedOut)
    }
}

/// A task record: identity plus lifecycle fields.
///
/// Values returned by the queue are snapshots; mutating them has no effect on
/// the queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task<P, T> {
    /// Unique task identifier.
    pub id: TaskId,
    /// Priority used for ready-list ordering.
    pub priority: Priority,
    /// Current lifecycle status.
    pub status: TaskStatus,
    /// Caller payload, handed to the handler on every attempt.
    pub payload: P,
    /// Handler output, present once `Completed`.
    pub result: Option<T>,
    /// Most recent attempt error.
    pub last_error: Option<String>,
    /// Number of attempts started so far.
    pub attempts: u32,
    /// Attempt budget: a retry is scheduled while `attempts < max_retries`.
    pub max_retries: u32,
    /// Per-attempt timeout.
    pub timeout: Duration,
    /// Backoff delays waited before each retry, in milliseconds.
    pub backoff_delays_ms: Vec<u64>,
    /// Creation time in milliseconds since epoch.
    pub created_at_ms: u128,
    /// Start time of the current or last attempt.
    pub started_at_ms: Option<u128>,
    /// Time the last attempt settled or timed out.
    pub completed_at_ms: Option<u128>,
}

impl<P, T> Task<P, T> {
    pub(crate) fn new(
        id: TaskId,
        payload: P,
        settings: TaskSettings,
        created_at_ms: u128,
    ) -> Self {
        Self {
            id,
            priority: settings.priority,
            status: TaskStatus::Pending,
            payload,
            result: None,
            last_error: None,
            attempts: 0,
            max_retries: settings.max_retries,
            timeout: settings.timeout,
            backoff_delays_ms: Vec::new(),
            created_at_ms,
            started_at_ms: None,
            completed_at_ms: None,
        }
    }

    /// Whether another attempt is allowed after the current one.
    #[must_use]
    pub const fn has_attempts_left(&self) -> bool {
        self.attempts < self.max_retries
    }
}

/// Optional per-submission overrides.
///
/// Raw integer fields are validated at submission so that values coming from
/// untyped callers (JSON, FFI) get the same checks as typed ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskOptions {
    /// Priority in 1..=5; defaults to [`Priority::DEFAULT`].
    pub priority: Option<i64>,
    /// Attempt budget; defaults to the queue's `default_max_retries`.
    pub max_retries: Option<i64>,
    /// Per-attempt timeout in milliseconds; defaults to the queue's.
    pub timeout_ms: Option<u64>,
}

impl TaskOptions {
    /// Empty options: every field falls back to queue defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: i64) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Set the attempt budget.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: i64) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Set the per-attempt timeout. Sub-millisecond remainders round up.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(duration_to_ms(timeout));
        self
    }

    /// Validate against queue defaults and resolve concrete settings.
    pub(crate) fn resolve(
        &self,
        default_max_retries: u32,
        default_timeout: Duration,
    ) -> Result<TaskSettings, SchedulerError> {
        let priority = match self.priority {
            Some(p) => Priority::new(p)?,
            None => Priority::DEFAULT,
        };
        let max_retries = match self.max_retries {
            Some(value) => {
                u32::try_from(value).map_err(|_| SchedulerError::InvalidMaxRetries { value })?
            }
            None => default_max_retries,
        };
        let timeout = match self.timeout_ms {
            Some(0) => return Err(SchedulerError::InvalidTimeout),
            Some(ms) => Duration::from_millis(ms),
            None => default_timeout,
        };
        Ok(TaskSettings {
            priority,
            max_retries,
            timeout,
        })
    }
}

/// Validated per-task settings.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TaskSettings {
    pub priority: Priority,
    pub max_retries: u32,
    pub timeout: Duration,
}
