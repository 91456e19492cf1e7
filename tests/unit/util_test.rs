//! Tests for utility functions

use prometheus_job_queue::core::{ReadyList, SchedulerError};
use prometheus_job_queue::util::{
    init_tracing, init_tracing_with_default, now_ms, Priority, TaskId, DEFAULT_LOG_DIRECTIVE,
};
use rand::seq::SliceRandom;
use rand::Rng;

#[test]
fn test_priority_ordering() {
    assert!(Priority::HIGHEST < Priority::DEFAULT);
    assert!(Priority::DEFAULT < Priority::LOWEST);
    assert_eq!(Priority::default(), Priority::DEFAULT);
}

#[test]
fn test_priority_range() {
    for v in 1..=5 {
        assert_eq!(i64::from(Priority::new(v).unwrap().value()), v);
    }
    for v in [0, 6, -3, i64::MAX] {
        assert!(matches!(
            Priority::new(v),
            Err(SchedulerError::PriorityOutOfRange { value }) if value == v
        ));
    }
}

#[test]
fn test_init_tracing_is_idempotent() {
    init_tracing();
    init_tracing_with_default("prometheus_job_queue=debug");
    tracing::info!(component = "util_test", "tracing initialized");
    assert!(tracing::dispatcher::has_been_set());
    assert_eq!(DEFAULT_LOG_DIRECTIVE, "prometheus_job_queue=info");
}

#[test]
fn test_now_ms_is_recent() {
    // 2020-01-01T00:00:00Z
    assert!(now_ms() > 1_577_836_800_000);
}

#[test]
fn test_ready_list_random_insertions_stay_sorted() {
    let mut rng = rand::rng();
    let mut entries: Vec<(TaskId, i64)> = (0..200).map(|id| (id, rng.random_range(1..=5))).collect();
    entries.shuffle(&mut rng);

    let mut list = ReadyList::new();
    for (id, priority) in &entries {
        list.insert(*id, Priority::new(*priority).unwrap());
    }

    // expected: stable sort of insertion order by priority
    let mut expected = entries.clone();
    expected.sort_by_key(|(_, priority)| *priority);
    let expected: Vec<TaskId> = expected.into_iter().map(|(id, _)| id).collect();

    assert_eq!(list.ids().collect::<Vec<_>>(), expected);
}
