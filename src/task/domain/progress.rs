//! Validated completion percentage.

use super::TaskDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Completion percentage in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Progress(u8);

impl Progress {
    /// No progress.
    pub const ZERO: Self = Self(0);
    /// Fully complete.
    pub const COMPLETE: Self = Self(100);

    /// Creates a validated progress value.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::ProgressOutOfRange`] when `value` is
    /// negative or above 100.
    pub fn new(value: i64) -> Result<Self, TaskDomainError> {
        u8::try_from(value)
            .ok()
            .filter(|percent| *percent <= 100)
            .map(Self)
            .ok_or(TaskDomainError::ProgressOutOfRange(value))
    }

    /// Returns the percentage.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Returns whether this is 100%.
    #[must_use]
    pub const fn is_complete(self) -> bool {
        self.0 == 100
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}
