//! Tests for reporting views

use std::time::Duration;

use prometheus_job_queue::builders::JobQueueBuilder;
use prometheus_job_queue::core::{JobQueue, TaskOptions, TaskStatus};
use prometheus_job_queue::runtime::{health, queue_stats, task_status};

#[tokio::test(start_paused = true)]
async fn test_task_status_view() {
    let queue: JobQueue<u32, u32> = JobQueueBuilder::new()
        .backoff_base(Duration::from_millis(10))
        .build()
        .unwrap();
    let id = queue
        .submit(
            |_: u32| async move { Err::<u32, _>(anyhow::anyhow!("disk full")) },
            0,
            TaskOptions::new().with_priority(2).with_max_retries(1),
        )
        .unwrap();
    queue.wait_for_task(id, Duration::from_secs(1)).await.unwrap();

    let view = task_status(&queue, id).unwrap();
    assert_eq!(view.task_id, id);
    assert_eq!(view.status, TaskStatus::Failed);
    assert_eq!(view.priority.value(), 2);
    assert_eq!(view.attempts, 1);
    assert_eq!(view.reason.as_deref(), Some("disk full"));

    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["status"], "failed");
    assert_eq!(json["priority"], 2);

    assert!(task_status(&queue, id + 1).is_none());
}

#[tokio::test]
async fn test_stats_and_health_views() {
    let queue: JobQueue<u32, u32> = JobQueueBuilder::new().build().unwrap();
    queue.pause();
    queue
        .submit(|n: u32| async move { Ok::<u32, anyhow::Error>(n) }, 1, TaskOptions::new())
        .unwrap();

    let stats = queue_stats(&queue);
    assert_eq!(stats.pending, 1);
    assert_eq!(stats.total, 1);
    assert!(stats.paused);

    let h = health(&queue);
    assert!(h.ok);
    assert!(h.paused);

    queue.dispose();
    assert!(!health(&queue).ok);

    let json = serde_json::to_value(queue_stats(&queue)).unwrap();
    assert_eq!(json["disposed"], true);
}
