//! Fluent construction of a [`JobQueue`] from configuration.

use std::time::Duration;

use crate::config::QueueConfig;
use crate::core::{JobQueue, SchedulerError, Spawn, TaskOutput, TaskPayload};
use crate::runtime::TokioSpawner;
use crate::util::clock::duration_to_ms;

/// Builder over [`QueueConfig`] with per-field overrides.
///
/// ```rust,ignore
/// let queue: JobQueue<u32, u32> = JobQueueBuilder::new()
///     .max_concurrency(4)
///     .default_timeout(Duration::from_secs(5))
///     .build()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct JobQueueBuilder {
    config: QueueConfig,
}

impl JobQueueBuilder {
    /// Start from the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration.
    #[must_use]
    pub const fn from_config(config: QueueConfig) -> Self {
        Self { config }
    }

    /// Start from the environment (see [`QueueConfig::from_env`]).
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidConfig`] if a variable is malformed.
    pub fn from_env() -> Result<Self, SchedulerError> {
        QueueConfig::from_env()
            .map(Self::from_config)
            .map_err(SchedulerError::InvalidConfig)
    }

    /// Maximum attempts in flight at once.
    #[must_use]
    pub const fn max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.config.max_concurrency = max_concurrency;
        self
    }

    /// Timeout applied to tasks that do not set their own.
    #[must_use]
    pub fn default_timeout(mut self, timeout: Duration) -> Self {
        self.config.default_timeout_ms = duration_to_ms(timeout);
        self
    }

    /// Attempt budget applied to tasks that do not set their own.
    #[must_use]
    pub const fn default_max_retries(mut self, max_retries: u32) -> Self {
        self.config.default_max_retries = max_retries;
        self
    }

    /// Base delay of the retry backoff.
    #[must_use]
    pub fn backoff_base(mut self, base: Duration) -> Self {
        self.config.backoff_base_ms = duration_to_ms(base);
        self
    }

    /// Configuration assembled so far.
    #[must_use]
    pub const fn config(&self) -> &QueueConfig {
        &self.config
    }

    /// Build a queue that spawns onto `spawner`.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidConfig`] if the configuration is invalid.
    pub fn build_with_spawner<P, T, S>(self, spawner: S) -> Result<JobQueue<P, T, S>, SchedulerError>
    where
        P: TaskPayload,
        T: TaskOutput,
        S: Spawn + Send + Sync + 'static,
    {
        JobQueue::new(self.config, spawner)
    }

    /// Build a queue on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidConfig`] if the configuration is
    /// invalid or no tokio runtime is running.
    pub fn build<P, T>(self) -> Result<JobQueue<P, T>, SchedulerError>
    where
        P: TaskPayload,
        T: TaskOutput,
    {
        let spawner = TokioSpawner::try_current()?;
        self.build_with_spawner(spawner)
    }
}
