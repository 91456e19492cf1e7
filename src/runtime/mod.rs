//! Runtime adapters and reporting views.

pub mod api;
pub mod tokio_spawner;

pub use api::{health, queue_stats, task_status, Health, TaskStatusResponse};
pub use tokio_spawner::TokioSpawner;
