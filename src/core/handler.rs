//! Task handler trait and payload/output bounds.

use std::future::Future;

use async_trait::async_trait;

use super::AppResult;

/// Marker trait for task payloads.
///
/// Payloads are cloned into every attempt, so they must be `Clone`, and
/// `Send + Sync` for cross-thread execution.
pub trait TaskPayload: Clone + Send + Sync + 'static {}

/// Blanket implementation: any type meeting the requirements is a `TaskPayload`.
impl<T> TaskPayload for T where T: Clone + Send + Sync + 'static {}

/// Marker trait for handler outputs stored on completed tasks.
pub trait TaskOutput: Clone + Send + Sync + 'static {}

impl<T> TaskOutput for T where T: Clone + Send + Sync + 'static {}

/// The unit of work behind a task.
///
/// Each attempt receives its own clone of the task payload. Returning `Err`
/// counts as a failed attempt; the error chain is recorded on the task.
///
/// Closures `Fn(P) -> impl Future<Output = AppResult<T>>` implement this
/// trait directly.
///
/// # Example
///
/// ```rust,ignore
/// use async_trait::async_trait;
/// use prometheus_job_queue::core::{AppResult, TaskHandler};
///
/// struct Resize;
///
/// #[async_trait]
/// impl TaskHandler<String, u64> for Resize {
///     async fn execute(&self, path: String) -> AppResult<u64> {
///         let bytes = tokio::fs::metadata(&path).await?.len();
///         Ok(bytes / 2)
///     }
/// }
/// ```
#[async_trait]
pub trait TaskHandler<P, T>: Send + Sync + 'static
where
    P: TaskPayload,
    T: TaskOutput,
{
    /// Run one attempt of the task.
    async fn execute(&self, payload: P) -> AppResult<T>;
}

#[async_trait]
impl<P, T, F, Fut> TaskHandler<P, T> for F
where
    P: TaskPayload,
    T: TaskOutput,
    F: Fn(P) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = AppResult<T>> + Send + 'static,
{
    async fn execute(&self, payload: P) -> AppResult<T> {
        (self)(payload).await
    }
}
