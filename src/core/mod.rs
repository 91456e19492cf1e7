//! Core scheduling: task records, the ready list, retry backoff and the job queue.

pub mod backoff;
pub mod error;
pub mod handler;
pub mod job_queue;
pub mod ready_list;
pub mod stats;
pub mod task;

mod state;

pub use backoff::Backoff;
pub use error::{AppResult, SchedulerError};
pub use handler::{TaskHandler, TaskOutput, TaskPayload};
pub use job_queue::{Hook, JobQueue, Spawn, TaskRequest};
pub use ready_list::ReadyList;
pub use stats::QueueStats;
pub use task::{Task, TaskOptions, TaskStatus, TIMEOUT_ERROR};
