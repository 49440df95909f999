//! Pending one-time code for a phone.

use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use serde::{Deserialize, Serialize};

use crate::clock::deadline;

/// Length of the verification code
pub const CODE_LENGTH: usize = 6;

/// The single live challenge of a phone. Issuing a new one replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationChallenge {
    /// The numeric code sent to the user
    pub code: String,

    /// Timestamp when the code was issued
    pub created_at: DateTime<Utc>,

    /// Wrong submissions against this challenge
    pub attempt_count: u32,
}

impl VerificationChallenge {
    /// Creates a fresh challenge with no attempts
    pub fn new(code: String, now: DateTime<Utc>) -> Self {
        Self {
            code,
            created_at: now,
            attempt_count: 0,
        }
    }

    /// Instant after which the challenge is expired
    pub fn expires_at(&self, ttl: Duration) -> DateTime<Utc> {
        deadline(self.created_at, ttl)
    }

    /// A challenge is expired strictly after `created_at + ttl`
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.created_at > ttl
    }

    /// Constant-time comparison against a submitted code
    pub fn matches(&self, input: &str) -> bool {
        if self.code.len() != input.len() {
            return false;
        }
        constant_time_eq(self.code.as_bytes(), input.as_bytes())
    }
}
