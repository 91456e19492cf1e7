//! Exponential retry backoff.

use std::time::Duration;

/// Doubling backoff: the retry after `n` attempts waits `base * 2^(n - 1)`.
///
/// The first retry (after one failed attempt) waits exactly `base`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    base: Duration,
}

impl Backoff {
    /// Create a backoff with the given base delay.
    #[must_use]
    pub const fn new(base: Duration) -> Self {
        Self { base }
    }

    /// Delay before the next attempt, given the number of attempts already made.
    ///
    /// Saturates at `Duration::MAX` instead of overflowing.
    #[must_use]
    pub fn delay_for(&self, attempts: u32) -> Duration {
        let exp = attempts.saturating_sub(1);
        match 1u32.checked_shl(exp) {
            Some(factor) => self.base.saturating_mul(factor),
            None => Duration::MAX,
        }
    }
}
