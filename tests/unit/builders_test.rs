//! Tests for builder modules

use std::time::Duration;

use prometheus_job_queue::builders::JobQueueBuilder;
use prometheus_job_queue::config::QueueConfig;
use prometheus_job_queue::core::{JobQueue, SchedulerError, TaskOptions, TaskStatus};
use prometheus_job_queue::runtime::TokioSpawner;

#[test]
fn test_builder_from_config() {
    let config = QueueConfig {
        max_concurrency: 2,
        default_timeout_ms: 100,
        default_max_retries: 1,
        backoff_base_ms: 10,
    };
    let builder = JobQueueBuilder::from_config(config.clone());
    assert_eq!(builder.config(), &config);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_builder_with_explicit_spawner() {
    let spawner = TokioSpawner::new(tokio::runtime::Handle::current());
    let queue: JobQueue<u32, u32> = JobQueueBuilder::new()
        .max_concurrency(2)
        .build_with_spawner(spawner)
        .unwrap();
    assert_eq!(queue.config().max_concurrency, 2);

    let id = queue
        .submit(
            |n: u32| async move { Ok::<u32, anyhow::Error>(n + 1) },
            41,
            TaskOptions::new(),
        )
        .unwrap();

    let task = queue.wait_for_task(id, Duration::from_secs(5)).await.unwrap();
    assert_eq!(task.status, TaskStatus::Completed);
    assert_eq!(task.result, Some(42));
}

#[tokio::test]
async fn test_builder_rejects_invalid_config() {
    let result: Result<JobQueue<u32, u32>, _> = JobQueueBuilder::new().max_concurrency(0).build();
    assert!(matches!(result, Err(SchedulerError::InvalidConfig(_))));
}

#[tokio::test]
async fn test_builder_uses_current_runtime() {
    let queue: JobQueue<String, usize> = JobQueueBuilder::new()
        .default_timeout(Duration::from_secs(2))
        .build()
        .unwrap();
    let id = queue
        .submit(
            |s: String| async move { Ok::<usize, anyhow::Error>(s.len()) },
            "hello".to_string(),
            TaskOptions::new().with_priority(1),
        )
        .unwrap();
    let task = queue.wait_for_task(id, Duration::from_secs(5)).await.unwrap();
    assert_eq!(task.result, Some(5));
    assert_eq!(task.timeout, Duration::from_secs(2));
}
