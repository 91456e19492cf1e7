//! Tokio runtime spawner implementation.

use std::future::Future;

use tokio::runtime::Handle;

use crate::core::{SchedulerError, Spawn};

/// Tokio-based spawner that runs queue futures on a tokio runtime.
#[derive(Debug, Clone)]
pub struct TokioSpawner {
    handle: Handle,
}

impl TokioSpawner {
    /// Create a spawner from a tokio runtime handle.
    #[must_use]
    pub const fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Spawner bound to the runtime the caller is running on.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime. Use
    /// [`TokioSpawner::try_current`] to get an error instead.
    #[must_use]
    pub fn current() -> Self {
        Self::new(Handle::current())
    }

    /// Spawner bound to the current runtime, if there is one.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidConfig`] outside a tokio runtime.
    pub fn try_current() -> Result<Self, SchedulerError> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|e| SchedulerError::InvalidConfig(format!("no tokio runtime: {e}")))
    }
}

impl Spawn for TokioSpawner {
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        drop(self.handle.spawn(fut));
    }
}
