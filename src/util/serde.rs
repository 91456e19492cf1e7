//! Serializable identifier and priority types shared across the crate.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::SchedulerError;

/// Process-unique task identifier, assigned monotonically by a queue.
pub type TaskId = u64;

/// Task priority. Lower numeric values are dispatched first.
///
/// Valid values are [`Priority::HIGHEST`] (1) through [`Priority::LOWEST`] (5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Priority(u8);

impl Priority {
    /// Most urgent priority.
    pub const HIGHEST: Self = Self(1);
    /// Priority used when a submission does not specify one.
    pub const DEFAULT: Self = Self(3);
    /// Least urgent priority.
    pub const LOWEST: Self = Self(5);

    /// Validate a raw priority value.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::PriorityOutOfRange`] if `value` is outside 1..=5.
    pub fn new(value: i64) -> Result<Self, SchedulerError> {
        match u8::try_from(value) {
            Ok(v) if (Self::HIGHEST.0..=Self::LOWEST.0).contains(&v) => Ok(Self(v)),
            _ => Err(SchedulerError::PriorityOutOfRange { value }),
        }
    }

    /// Numeric value of this priority.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for Priority {
    type Error = SchedulerError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Priority> for u8 {
    fn from(p: Priority) -> Self {
        p.0
    }
}
