//! Configuration models for queues and their defaults.

pub mod queue;

pub use queue::QueueConfig;
