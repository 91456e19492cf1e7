//! Point-in-time queue statistics.

use serde::{Deserialize, Serialize};

use super::TaskStatus;

/// Counts of tasks per status plus queue-level gauges.
///
/// The per-status counts always sum to `total`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStats {
    /// Tasks waiting for dispatch or behind a backoff delay.
    pub pending: usize,
    /// Tasks with an attempt in flight.
    pub running: usize,
    /// Tasks finished successfully.
    pub completed: usize,
    /// Tasks that exhausted their attempts with an error.
    pub failed: usize,
    /// Tasks that exhausted their attempts with a timeout.
    pub timed_out: usize,
    /// Every task record held by the queue.
    pub total: usize,
    /// Ids currently in the ready list.
    pub queued: usize,
    /// Ids currently in the in-flight set.
    pub in_flight: usize,
    /// Whether dispatch is paused.
    pub paused: bool,
    /// Whether the queue has been disposed.
    pub disposed: bool,
}

impl QueueStats {
    /// Count one task with the given status.
    pub(crate) fn record(&mut self, status: TaskStatus) {
        match status {
            TaskStatus::Pending => self.pending += 1,
            TaskStatus::Running => self.running += 1,
            TaskStatus::Completed => self.completed += 1,
            TaskStatus::Failed => self.failed += 1,
            TaskStatus::TimedOut => self.timed_out += 1,
        }
        self.total += 1;
    }

    /// Count for a single status.
    #[must_use]
    pub const fn count(&self, status: TaskStatus) -> usize {
        match status {
            TaskStatus::Pending => self.pending,
            TaskStatus::Running => self.running,
            TaskStatus::Completed => self.completed,
            TaskStatus::Failed => self.failed,
            TaskStatus::TimedOut => self.timed_out,
        }
    }
}
