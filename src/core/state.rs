//! Queue state and the transitions applied to it under the queue lock.
//!
//! Every method here is synchronous and runs while the caller holds the
//! single queue mutex, so transitions never interleave. The async side
//! (spawning attempts, arming timers, firing hooks) lives in
//! [`crate::core::job_queue`] and acts on the values these methods return.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::task::{TaskSettings, TIMEOUT_ERROR};
use super::{AppResult, Backoff, QueueStats, ReadyList, SchedulerError, Task, TaskHandler, TaskStatus};
use crate::util::clock::duration_to_ms;
use crate::util::serde::TaskId;

/// Handler as held by the registry.
pub(crate) type SharedHandler<P, T> = Arc<dyn TaskHandler<P, T>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TimerKind {
    /// Guards a running attempt.
    Timeout,
    /// Delays a retry.
    Backoff,
}

/// A live timer: one per task at most.
#[derive(Debug)]
pub(crate) struct Timer {
    pub kind: TimerKind,
    pub token: CancellationToken,
}

/// Everything a supervisor needs to run one attempt.
pub(crate) struct Launch<P, T> {
    pub id: TaskId,
    pub attempt: u32,
    pub handler: SharedHandler<P, T>,
    pub payload: P,
    pub timeout: Duration,
    pub token: CancellationToken,
}

/// Which completion signal won the race for an attempt.
pub(crate) enum AttemptOutcome<T> {
    Settled(AppResult<T>),
    TimedOut,
}

/// Terminal transition to report through the hooks.
pub(crate) enum Notice<P, T> {
    Completed(Task<P, T>),
    Failed(Task<P, T>),
}

impl<P, T> Notice<P, T> {
    pub(crate) const fn task(&self) -> &Task<P, T> {
        match self {
            Self::Completed(task) | Self::Failed(task) => task,
        }
    }
}

/// Backoff timer to arm after a failed attempt.
pub(crate) struct RetryTimer {
    pub id: TaskId,
    pub delay: Duration,
    pub token: CancellationToken,
}

/// Result of applying an attempt outcome.
pub(crate) struct Settlement<P, T> {
    pub notice: Option<Notice<P, T>>,
    pub retry: Option<RetryTimer>,
}

/// Single source of truth for one queue.
pub(crate) struct QueueState<P, T> {
    tasks: HashMap<TaskId, Task<P, T>>,
    handlers: HashMap<TaskId, SharedHandler<P, T>>,
    ready: ReadyList,
    in_flight: HashSet<TaskId>,
    timers: HashMap<TaskId, Timer>,
    /// Parent of every timer token; cancelled on dispose.
    root: CancellationToken,
    next_id: TaskId,
    paused: bool,
    disposed: bool,
    dispatch_scheduled: bool,
}

impl<P, T> QueueState<P, T> {
    /// Cancel every live timer token without touching task records.
    pub(crate) fn cancel_timers(&self) {
        self.root.cancel();
    }
}

impl<P, T> QueueState<P, T>
where
    P: Clone,
    T: Clone,
{
    pub(crate) fn new() -> Self {
        Self {
            tasks: HashMap::new(),
            handlers: HashMap::new(),
            ready: ReadyList::new(),
            in_flight: HashSet::new(),
            timers: HashMap::new(),
            root: CancellationToken::new(),
            next_id: 1,
            paused: false,
            disposed: false,
            dispatch_scheduled: false,
        }
    }

    /// Create a pending task, register its handler and queue it.
    pub(crate) fn admit(
        &mut self,
        handler: SharedHandler<P, T>,
        payload: P,
        settings: TaskSettings,
        now_ms: u128,
    ) -> Result<TaskId, SchedulerError> {
        if self.disposed {
            return Err(SchedulerError::Disposed);
        }
        let id = self.next_id;
        self.next_id += 1;
        self.tasks.insert(id, Task::new(id, payload, settings, now_ms));
        self.handlers.insert(id, handler);
        self.ready.insert(id, settings.priority);
        Ok(id)
    }

    /// Mark a dispatch pass as scheduled. Returns false if one is already
    /// scheduled or dispatch cannot run at all.
    pub(crate) fn request_dispatch(&mut self) -> bool {
        if self.disposed || self.paused || self.dispatch_scheduled {
            return false;
        }
        self.dispatch_scheduled = true;
        true
    }

    /// Run a dispatch pass: move ready tasks into flight while capacity allows.
    pub(crate) fn take_launches(&mut self, max_concurrency: usize, now_ms: u128) -> Vec<Launch<P, T>> {
        self.dispatch_scheduled = false;
        let mut launches = Vec::new();
        if self.paused || self.disposed {
            return launches;
        }

        while self.in_flight.len() < max_concurrency {
            let Some(id) = self.ready.pop_front() else {
                break;
            };
            let Some(task) = self.tasks.get_mut(&id) else {
                debug!(task_id = id, "skipping stale ready entry");
                continue;
            };
            if task.status != TaskStatus::Pending {
                debug!(task_id = id, status = ?task.status, "skipping ready entry that is not pending");
                continue;
            }
            let Some(handler) = self.handlers.get(&id) else {
                warn!(task_id = id, "pending task has no handler");
                continue;
            };

            task.status = TaskStatus::Running;
            task.attempts = task.attempts.saturating_add(1);
            task.started_at_ms = Some(now_ms);
            task.completed_at_ms = None;
            self.in_flight.insert(id);

            let token = self.root.child_token();
            self.timers.insert(
                id,
                Timer {
                    kind: TimerKind::Timeout,
                    token: token.clone(),
                },
            );
            debug!(task_id = id, attempt = task.attempts, priority = %task.priority, "dispatching task");
            launches.push(Launch {
                id,
                attempt: task.attempts,
                handler: Arc::clone(handler),
                payload: task.payload.clone(),
                timeout: task.timeout,
                token,
            });
        }
        launches
    }

    /// Apply the winning outcome of an attempt.
    ///
    /// Returns `None` when the outcome is stale: the queue was disposed, the
    /// task is gone, or the task has already moved past this attempt.
    pub(crate) fn settle(
        &mut self,
        id: TaskId,
        attempt: u32,
        outcome: AttemptOutcome<T>,
        backoff: Backoff,
        now_ms: u128,
    ) -> Option<Settlement<P, T>> {
        if self.disposed {
            return None;
        }
        let task = self.tasks.get_mut(&id)?;
        if task.status != TaskStatus::Running || task.attempts != attempt {
            return None;
        }

        self.in_flight.remove(&id);
        self.timers.remove(&id);
        task.completed_at_ms = Some(now_ms);

        let (status, error) = match outcome {
            AttemptOutcome::Settled(Ok(value)) => {
                task.status = TaskStatus::Completed;
                task.result = Some(value);
                self.handlers.remove(&id);
                info!(task_id = id, attempts = task.attempts, "task completed");
                return Some(Settlement {
                    notice: Some(Notice::Completed(task.clone())),
                    retry: None,
                });
            }
            AttemptOutcome::Settled(Err(err)) => (TaskStatus::Failed, format!("{err:#}")),
            AttemptOutcome::TimedOut => (TaskStatus::TimedOut, TIMEOUT_ERROR.to_string()),
        };
        task.status = status;
        task.last_error = Some(error);

        if task.has_attempts_left() {
            let delay = backoff.delay_for(task.attempts);
            let delay_ms = duration_to_ms(delay);
            task.status = TaskStatus::Pending;
            task.backoff_delays_ms.push(delay_ms);
            info!(
                task_id = id,
                attempt,
                outcome = ?status,
                delay_ms,
                "attempt failed, retry scheduled"
            );

            let token = self.root.child_token();
            self.timers.insert(
                id,
                Timer {
                    kind: TimerKind::Backoff,
                    token: token.clone(),
                },
            );
            return Some(Settlement {
                notice: None,
                retry: Some(RetryTimer { id, delay, token }),
            });
        }

        self.handlers.remove(&id);
        warn!(
            task_id = id,
            attempts = task.attempts,
            status = ?status,
            error = task.last_error.as_deref().unwrap_or_default(),
            "task failed, no attempts left"
        );
        Some(Settlement {
            notice: Some(Notice::Failed(task.clone())),
            retry: None,
        })
    }

    /// Put a task back in the ready list once its backoff elapsed.
    ///
    /// Returns false if the timer was cancelled or the task is no longer
    /// waiting on it.
    pub(crate) fn requeue(&mut self, id: TaskId, token: &CancellationToken) -> bool {
        if self.disposed || token.is_cancelled() {
            return false;
        }
        match self.timers.get(&id) {
            Some(timer) if timer.kind == TimerKind::Backoff => {}
            _ => return false,
        }
        let Some(task) = self.tasks.get(&id) else {
            return false;
        };
        if task.status != TaskStatus::Pending {
            return false;
        }
        self.timers.remove(&id);
        self.ready.insert(id, task.priority);
        debug!(task_id = id, priority = %task.priority, "task requeued after backoff");
        true
    }

    /// Stop dispatching new attempts.
    pub(crate) fn pause(&mut self) {
        self.paused = true;
    }

    /// Allow dispatch again. Returns false if the queue is disposed.
    pub(crate) fn resume(&mut self) -> bool {
        if self.disposed {
            return false;
        }
        self.paused = false;
        true
    }

    /// Drop every pending task, including those waiting on a backoff timer.
    pub(crate) fn clear(&mut self) -> usize {
        let removed: HashSet<TaskId> = self
            .tasks
            .values()
            .filter(|t| t.status == TaskStatus::Pending)
            .map(|t| t.id)
            .collect();

        for id in &removed {
            self.tasks.remove(id);
            self.handlers.remove(id);
            if let Some(timer) = self.timers.remove(id) {
                timer.token.cancel();
            }
        }
        self.ready.retain(|id| !removed.contains(&id));
        removed.len()
    }

    /// Make the queue inert. Returns false if it already was.
    pub(crate) fn dispose(&mut self) -> bool {
        if self.disposed {
            return false;
        }
        self.paused = true;
        self.disposed = true;
        self.root.cancel();
        self.timers.clear();
        self.ready.clear();
        self.handlers.clear();
        true
    }

    pub(crate) fn task(&self, id: TaskId) -> Option<&Task<P, T>> {
        self.tasks.get(&id)
    }

    pub(crate) const fn is_paused(&self) -> bool {
        self.paused
    }

    pub(crate) const fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub(crate) fn stats(&self) -> QueueStats {
        let mut stats = QueueStats::default();
        for task in self.tasks.values() {
            stats.record(task.status);
        }
        stats.queued = self.ready.len();
        stats.in_flight = self.in_flight.len();
        stats.paused = self.paused;
        stats.disposed = self.disposed;
        stats
    }

    #[cfg(test)]
    fn live_timers(&self) -> usize {
        self.timers.len()
    }
}
