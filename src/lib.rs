//! # Prometheus Job Queue
//!
//! An in-process asynchronous job scheduler for tokio applications.
//!
//! Callers submit units of work (a payload plus an async handler) with a
//! priority from 1 (highest) to 5 (lowest). The queue runs at most
//! `max_concurrency` attempts at a time, bounds each attempt with a timeout,
//! and retries failures with exponential backoff until the task's attempt
//! budget is spent.
//!
//! ## Key Features
//!
//! - **Priority ready list**: lower numbers run first, FIFO within a priority
//! - **Bounded concurrency**: never more than `max_concurrency` in flight
//! - **Per-attempt timeouts**: a timed-out attempt frees its slot at once
//! - **Exponential backoff**: the retry after `n` attempts waits `base * 2^(n-1)`
//! - **Lifecycle controls**: pause, resume, clear and dispose
//! - **Hooks**: one `on_completed` and one `on_failed` callback per queue
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use prometheus_job_queue::builders::JobQueueBuilder;
//! use prometheus_job_queue::core::{JobQueue, TaskOptions};
//!
//! let queue: JobQueue<u64, u64> = JobQueueBuilder::new()
//!     .max_concurrency(2)
//!     .backoff_base(Duration::from_millis(100))
//!     .build()?;
//!
//! queue.on_failed(|task| eprintln!("task {} failed: {:?}", task.id, task.last_error));
//!
//! let id = queue.submit(
//!     |n: u64| async move { Ok::<_, anyhow::Error>(n * 2) },
//!     21,
//!     TaskOptions::new().with_priority(1).with_max_retries(3),
//! )?;
//! let task = queue.wait_for_task(id, Duration::from_secs(1)).await?;
//! assert_eq!(task.result, Some(42));
//! ```
//!
//! For complete scenarios, see `tests/job_queue_test.rs`.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core scheduling: tasks, ready list, backoff and the queue itself.
pub mod core;
/// Configuration models for the queue.
pub mod config;
/// Builders to construct queues from configuration.
pub mod builders;
/// Runtime adapters and reporting views.
pub mod runtime;
/// Shared utilities.
pub mod util;
