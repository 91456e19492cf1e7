//! Job queue: dispatch, supervision, retry scheduling and lifecycle controls.
//!
//! A [`JobQueue`] is a cheap, cloneable handle. All scheduler state sits
//! behind one `parking_lot::Mutex`; every transition (admission, dispatch,
//! settlement, requeue, clear, dispose) happens under that lock, and the
//! lock is never held across an `.await` or while user code runs.
//!
//! Each attempt is supervised by its own spawned future racing three signals:
//! the handler settling, the attempt timeout, and queue disposal. The handler
//! itself runs as a separate spawned task so a timeout frees the concurrency
//! slot without forcing the work to stop; a settlement that arrives after
//! the timeout won is discarded.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tokio::sync::{oneshot, Notify};
use tracing::{debug, info, warn};

use super::state::{AttemptOutcome, Launch, Notice, QueueState, RetryTimer, SharedHandler};
use super::{
    Backoff, QueueStats, SchedulerError, Task, TaskHandler, TaskOptions, TaskOutput, TaskPayload,
};
use crate::config::QueueConfig;
use crate::runtime::TokioSpawner;
use crate::util::clock::now_ms;
use crate::util::serde::TaskId;

/// Abstraction for spawning futures on a runtime.
pub trait Spawn {
    /// Spawn a detached future.
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static;
}

/// Callback fired on a terminal transition.
pub type Hook<P, T> = Arc<dyn Fn(&Task<P, T>) + Send + Sync>;

struct Hooks<P, T> {
    on_completed: Option<Hook<P, T>>,
    on_failed: Option<Hook<P, T>>,
}

/// A submission: payload, handler and options.
///
/// Built with [`TaskRequest::new`]; submitting a request that never received
/// a handler fails with [`SchedulerError::InvalidHandler`].
pub struct TaskRequest<P, T> {
    handler: Option<SharedHandler<P, T>>,
    payload: P,
    options: TaskOptions,
}

impl<P, T> TaskRequest<P, T>
where
    P: TaskPayload,
    T: TaskOutput,
{
    /// Start a request for `payload` with default options and no handler.
    pub fn new(payload: P) -> Self {
        Self {
            handler: None,
            payload,
            options: TaskOptions::default(),
        }
    }

    /// Attach the handler.
    #[must_use]
    pub fn with_handler<H>(mut self, handler: H) -> Self
    where
        H: TaskHandler<P, T>,
    {
        self.handler = Some(Arc::new(handler));
        self
    }

    /// Attach a handler shared with other requests.
    #[must_use]
    pub fn with_shared_handler(mut self, handler: Arc<dyn TaskHandler<P, T>>) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Replace the options.
    #[must_use]
    pub fn with_options(mut self, options: TaskOptions) -> Self {
        self.options = options;
        self
    }
}

struct Inner<P, T, S> {
    config: QueueConfig,
    backoff: Backoff,
    state: Mutex<QueueState<P, T>>,
    hooks: RwLock<Hooks<P, T>>,
    /// Woken on every terminal transition, clear and dispose.
    settled: Notify,
    spawner: S,
}

impl<P, T, S> Drop for Inner<P, T, S> {
    fn drop(&mut self) {
        // supervisors still waiting on late settlements stop here
        self.state.get_mut().cancel_timers();
    }
}

/// In-process priority job queue with bounded concurrency, per-attempt
/// timeouts and exponential retry backoff.
///
/// # Example
///
/// ```rust,ignore
/// use std::time::Duration;
/// use prometheus_job_queue::config::QueueConfig;
/// use prometheus_job_queue::core::{JobQueue, TaskOptions};
/// use prometheus_job_queue::runtime::TokioSpawner;
///
/// let queue: JobQueue<String, usize> = JobQueue::new(
///     QueueConfig { max_concurrency: 2, ..QueueConfig::default() },
///     TokioSpawner::current(),
/// )?;
///
/// let id = queue.submit(
///     |s: String| async move { Ok::<_, anyhow::Error>(s.len()) },
///     "hello".to_string(),
///     TaskOptions::new().with_priority(1),
/// )?;
/// let task = queue.wait_for_task(id, Duration::from_secs(5)).await?;
/// assert_eq!(task.result, Some(5));
/// ```
pub struct JobQueue<P, T, S = TokioSpawner> {
    inner: Arc<Inner<P, T, S>>,
}

impl<P, T, S> Clone for JobQueue<P, T, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P, T, S> JobQueue<P, T, S>
where
    P: TaskPayload,
    T: TaskOutput,
    S: Spawn + Send + Sync + 'static,
{
    /// Create a queue from configuration and a spawner.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidConfig`] if the configuration is invalid.
    pub fn new(config: QueueConfig, spawner: S) -> Result<Self, SchedulerError> {
        config.validate().map_err(SchedulerError::InvalidConfig)?;

        info!(
            max_concurrency = config.max_concurrency,
            default_timeout_ms = config.default_timeout_ms,
            default_max_retries = config.default_max_retries,
            backoff_base_ms = config.backoff_base_ms,
            "job queue initialized"
        );

        Ok(Self {
            inner: Arc::new(Inner {
                backoff: Backoff::new(config.backoff_base()),
                config,
                state: Mutex::new(QueueState::new()),
                hooks: RwLock::new(Hooks {
                    on_completed: None,
                    on_failed: None,
                }),
                settled: Notify::new(),
                spawner,
            }),
        })
    }

    /// Submit a task and return its identifier.
    ///
    /// Dispatch happens on the spawner shortly after this returns. On a
    /// multi-threaded runtime a dispatch pass may run between two calls, so
    /// a burst of submissions is not guaranteed to start in priority order.
    /// To order a batch, [`pause`](Self::pause) the queue, submit it, then
    /// [`resume`](Self::resume).
    ///
    /// # Errors
    ///
    /// - [`SchedulerError::PriorityOutOfRange`], [`SchedulerError::InvalidMaxRetries`],
    ///   [`SchedulerError::InvalidTimeout`] for invalid options
    /// - [`SchedulerError::Disposed`] if the queue has been disposed
    pub fn submit<H>(&self, handler: H, payload: P, options: TaskOptions) -> Result<TaskId, SchedulerError>
    where
        H: TaskHandler<P, T>,
    {
        self.submit_request(
            TaskRequest::new(payload)
                .with_handler(handler)
                .with_options(options),
        )
    }

    /// Submit a prepared [`TaskRequest`].
    ///
    /// # Errors
    ///
    /// Same as [`JobQueue::submit`], plus [`SchedulerError::InvalidHandler`]
    /// if the request carries no handler.
    pub fn submit_request(&self, request: TaskRequest<P, T>) -> Result<TaskId, SchedulerError> {
        let TaskRequest {
            handler,
            payload,
            options,
        } = request;

        let handler = handler.ok_or(SchedulerError::InvalidHandler)?;
        let settings = options.resolve(
            self.inner.config.default_max_retries,
            self.inner.config.default_timeout(),
        )?;
        let id = self
            .inner
            .state
            .lock()
            .admit(handler, payload, settings, now_ms())
            .inspect_err(|_| warn!("submission rejected: queue disposed"))?;

        info!(
            task_id = id,
            priority = %settings.priority,
            max_retries = settings.max_retries,
            "task submitted"
        );
        self.inner.schedule_dispatch();
        Ok(id)
    }

    /// Snapshot of a task, or `None` if the id is unknown or was cleared.
    #[must_use]
    pub fn get_task(&self, id: TaskId) -> Option<Task<P, T>> {
        self.inner.state.lock().task(id).cloned()
    }

    /// Counts per status plus queue gauges.
    #[must_use]
    pub fn stats(&self) -> QueueStats {
        self.inner.state.lock().stats()
    }

    /// Stop dispatching new attempts. Running attempts and armed timers are
    /// unaffected.
    pub fn pause(&self) {
        self.inner.state.lock().pause();
        info!("job queue paused");
    }

    /// Resume dispatching. No effect on a disposed queue.
    pub fn resume(&self) {
        if !self.inner.state.lock().resume() {
            warn!("resume ignored: queue disposed");
            return;
        }
        info!("job queue resumed");
        self.inner.schedule_dispatch();
    }

    /// Drop every pending task, cancelling any retry timer armed for it.
    /// Running tasks are left alone. Returns the number of tasks removed.
    pub fn clear(&self) -> usize {
        let removed = self.inner.state.lock().clear();
        info!(removed, "pending tasks cleared");
        self.inner.settled.notify_waiters();
        removed
    }

    /// Shut the queue down for good.
    ///
    /// Cancels every timeout and retry timer and empties the ready list.
    /// Handlers already executing keep running, but their results are
    /// discarded and no hook fires. Later submissions fail with
    /// [`SchedulerError::Disposed`].
    pub fn dispose(&self) {
        if !self.inner.state.lock().dispose() {
            debug!("dispose called on an already disposed queue");
            return;
        }
        info!("job queue disposed");
        self.inner.settled.notify_waiters();
    }

    /// Register the callback fired when a task completes. Replaces any
    /// previous registration.
    pub fn on_completed<F>(&self, hook: F)
    where
        F: Fn(&Task<P, T>) + Send + Sync + 'static,
    {
        self.inner.hooks.write().on_completed = Some(Arc::new(hook));
    }

    /// Register the callback fired when a task fails for good, by error or
    /// timeout. Replaces any previous registration.
    pub fn on_failed<F>(&self, hook: F)
    where
        F: Fn(&Task<P, T>) + Send + Sync + 'static,
    {
        self.inner.hooks.write().on_failed = Some(Arc::new(hook));
    }

    /// Wait until a task reaches a terminal status and return its snapshot.
    ///
    /// # Errors
    ///
    /// - [`SchedulerError::TaskNotFound`] if the id is unknown or gets cleared
    /// - [`SchedulerError::Disposed`] if the queue is disposed first
    /// - [`SchedulerError::WaitTimeout`] if `timeout` elapses first
    pub async fn wait_for_task(&self, id: TaskId, timeout: Duration) -> Result<Task<P, T>, SchedulerError> {
        let wait = async {
            loop {
                let notified = self.inner.settled.notified();
                tokio::pin!(notified);
                notified.as_mut().enable();
                {
                    let state = self.inner.state.lock();
                    match state.task(id) {
                        None => return Err(SchedulerError::TaskNotFound(id)),
                        Some(task) if task.status.is_terminal() => return Ok(task.clone()),
                        Some(_) => {}
                    }
                    if state.is_disposed() {
                        return Err(SchedulerError::Disposed);
                    }
                }
                notified.await;
            }
        };
        tokio::time::timeout(timeout, wait)
            .await
            .map_err(|_| SchedulerError::WaitTimeout(id))?
    }

    /// Whether dispatch is paused.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.inner.state.lock().is_paused()
    }

    /// Whether the queue has been disposed.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.inner.state.lock().is_disposed()
    }

    /// Configuration this queue was built with.
    #[must_use]
    pub fn config(&self) -> &QueueConfig {
        &self.inner.config
    }
}

impl<P, T, S> Inner<P, T, S>
where
    P: TaskPayload,
    T: TaskOutput,
    S: Spawn + Send + Sync + 'static,
{
    /// Schedule a dispatch pass unless one is already pending.
    fn schedule_dispatch(self: &Arc<Self>) {
        if !self.state.lock().request_dispatch() {
            return;
        }
        let inner = Arc::clone(self);
        self.spawner.spawn(async move { inner.dispatch() });
    }

    fn dispatch(self: &Arc<Self>) {
        let launches = self
            .state
            .lock()
            .take_launches(self.config.max_concurrency, now_ms());
        for launch in launches {
            self.spawner.spawn(Self::supervise(Arc::clone(self), launch));
        }
    }

    /// Race one attempt against its timeout and apply whichever wins.
    fn supervise(
        self: Arc<Self>,
        launch: Launch<P, T>,
    ) -> Pin<Box<dyn Future<Output = ()> + Send + 'static>> {
        Box::pin(async move {
            let Launch {
                id,
                attempt,
                handler,
                payload,
                timeout,
                token,
            } = launch;

            let (tx, mut rx) = oneshot::channel();
            self.spawner.spawn(async move {
                let result = handler.execute(payload).await;
                let _ = tx.send(result);
            });

            let outcome = tokio::select! {
                biased;
                () = token.cancelled() => {
                    debug!(task_id = id, attempt, "attempt abandoned: queue disposed");
                    return;
                }
                settled = &mut rx => AttemptOutcome::Settled(settled.unwrap_or_else(|_| {
                    Err(anyhow::anyhow!("handler panicked before settling"))
                })),
                () = tokio::time::sleep(timeout) => AttemptOutcome::TimedOut,
            };

            let timed_out = matches!(outcome, AttemptOutcome::TimedOut);
            if timed_out {
                debug!(task_id = id, attempt, timeout = ?timeout, "attempt timed out");
            }
            self.finish_attempt(id, attempt, outcome);
            if !timed_out {
                return;
            }

            // the handler may never settle; waiting on it must not keep the queue alive
            drop(self);
            tokio::select! {
                () = token.cancelled() => {}
                late = rx => {
                    if let Ok(late) = late {
                        debug!(
                            task_id = id,
                            attempt,
                            succeeded = late.is_ok(),
                            "discarded settlement that arrived after timeout"
                        );
                    }
                }
            }
        })
    }

    fn finish_attempt(self: &Arc<Self>, id: TaskId, attempt: u32, outcome: AttemptOutcome<T>) {
        let settlement = self
            .state
            .lock()
            .settle(id, attempt, outcome, self.backoff, now_ms());
        let Some(settlement) = settlement else {
            debug!(task_id = id, attempt, "stale attempt outcome ignored");
            return;
        };

        if let Some(retry) = settlement.retry {
            self.arm_retry(retry);
        }
        self.schedule_dispatch();

        if let Some(notice) = settlement.notice {
            self.settled.notify_waiters();
            self.notify(&notice);
        }
    }

    /// Requeue the task once its backoff elapses, unless cancelled first.
    fn arm_retry(self: &Arc<Self>, retry: RetryTimer) {
        let RetryTimer { id, delay, token } = retry;
        let inner = Arc::clone(self);
        self.spawner.spawn(async move {
            tokio::select! {
                () = token.cancelled() => {
                    debug!(task_id = id, "retry timer cancelled");
                }
                () = tokio::time::sleep(delay) => {
                    if inner.state.lock().requeue(id, &token) {
                        inner.schedule_dispatch();
                    }
                }
            }
        });
    }

    fn notify(&self, notice: &Notice<P, T>) {
        let hook = {
            let hooks = self.hooks.read();
            match notice {
                Notice::Completed(_) => hooks.on_completed.clone(),
                Notice::Failed(_) => hooks.on_failed.clone(),
            }
        };
        if let Some(hook) = hook {
            hook(notice.task());
        }
    }
}
