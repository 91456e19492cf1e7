//! Serializable reporting views over a job queue.

use serde::{Deserialize, Serialize};

use crate::core::{JobQueue, QueueStats, Spawn, Task, TaskOutput, TaskPayload, TaskStatus};
use crate::util::serde::{Priority, TaskId};

/// Task status response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStatusResponse {
    /// Task identifier.
    pub task_id: TaskId,
    /// Current status.
    pub status: TaskStatus,
    /// Priority the task was submitted with.
    pub priority: Priority,
    /// Attempts started so far.
    pub attempts: u32,
    /// Most recent attempt error, if any.
    pub reason: Option<String>,
}

impl<P, T> From<&Task<P, T>> for TaskStatusResponse {
    fn from(task: &Task<P, T>) -> Self {
        Self {
            task_id: task.id,
            status: task.status,
            priority: task.priority,
            attempts: task.attempts,
            reason: task.last_error.clone(),
        }
    }
}

/// Health response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    /// Healthy flag: the queue accepts submissions.
    pub ok: bool,
    /// Whether dispatch is paused.
    pub paused: bool,
}

/// Status view of a single task, or `None` if the id is unknown.
pub fn task_status<P, T, S>(queue: &JobQueue<P, T, S>, id: TaskId) -> Option<TaskStatusResponse>
where
    P: TaskPayload,
    T: TaskOutput,
    S: Spawn + Send + Sync + 'static,
{
    queue.get_task(id).as_ref().map(TaskStatusResponse::from)
}

/// Stats snapshot of a queue.
pub fn queue_stats<P, T, S>(queue: &JobQueue<P, T, S>) -> QueueStats
where
    P: TaskPayload,
    T: TaskOutput,
    S: Spawn + Send + Sync + 'static,
{
    queue.stats()
}

/// Return a health payload.
pub fn health<P, T, S>(queue: &JobQueue<P, T, S>) -> Health
where
    P: TaskPayload,
    T: TaskOutput,
    S: Spawn + Send + Sync + 'static,
{
    Health {
        ok: !queue.is_disposed(),
        paused: queue.is_paused(),
    }
}
