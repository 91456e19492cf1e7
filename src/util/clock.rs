//! Wall-clock helpers used for task timestamps.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch.
///
/// Returns 0 if the system clock is set before the epoch.
#[must_use]
pub fn now_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

/// Whole milliseconds in `duration`, rounding a non-zero sub-millisecond
/// remainder up and saturating at `u64::MAX`.
#[must_use]
pub fn duration_to_ms(duration: Duration) -> u64 {
    let mut ms = duration.as_millis();
    if duration.subsec_nanos() % 1_000_000 != 0 {
        ms += 1;
    }
    u64::try_from(ms).unwrap_or(u64::MAX)
}
