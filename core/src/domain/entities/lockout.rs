//! Temporary block placed on a phone after too many wrong codes.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::deadline;

/// Lockout of one phone. Logically absent once `now >= blocked_until`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockoutRecord {
    /// End of the lockout window
    pub blocked_until: DateTime<Utc>,
}

impl LockoutRecord {
    /// Lock starting at `now` for `duration`
    pub fn new(now: DateTime<Utc>, duration: Duration) -> Self {
        Self {
            blocked_until: deadline(now, duration),
        }
    }

    /// Whether the window is still running
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        now < self.blocked_until
    }

    /// Whole minutes left, rounded up; 0 once the window has elapsed
    pub fn remaining_minutes(&self, now: DateTime<Utc>) -> i64 {
        let remaining_ms = (self.blocked_until - now).num_milliseconds();
        if remaining_ms <= 0 {
            return 0;
        }
        (remaining_ms + 59_999) / 60_000
    }
}
