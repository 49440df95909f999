//! Authenticated dashboard session.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::deadline;

/// Session minted after a successful verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque unique token (64 hex characters)
    pub token: String,

    /// Phone the session belongs to
    pub phone: String,

    /// Timestamp when the session was created
    pub created_at: DateTime<Utc>,

    /// Last successful validation; drives the sliding expiry
    pub last_activity: DateTime<Utc>,
}

impl Session {
    /// Creates a session active as of `now`
    pub fn new(token: String, phone: String, now: DateTime<Utc>) -> Self {
        Self {
            token,
            phone,
            created_at: now,
            last_activity: now,
        }
    }

    /// Valid iff `now - last_activity < idle_timeout`
    pub fn is_expired(&self, now: DateTime<Utc>, idle_timeout: Duration) -> bool {
        now - self.last_activity >= idle_timeout
    }

    /// Push the idle deadline forward
    pub fn touch(&mut self, now: DateTime<Utc>) {
        if now > self.last_activity {
            self.last_activity = now;
        }
    }

    /// Deadline after which the session is considered idle
    pub fn idle_deadline(&self, idle_timeout: Duration) -> DateTime<Utc> {
        deadline(self.last_activity, idle_timeout)
    }
}
