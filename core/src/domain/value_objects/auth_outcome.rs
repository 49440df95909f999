//! Successful results of the authentication operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A freshly issued one-time code. Delivering it is the caller's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedCode {
    /// Phone the code was issued for
    pub phone: String,

    /// The 6-digit code
    pub code: String,

    /// Timestamp when the code was issued
    pub issued_at: DateTime<Utc>,

    /// Last instant at which the code is still accepted
    pub expires_at: DateTime<Utc>,

    /// Whether an unconsumed code was invalidated by this issue
    pub replaced_previous: bool,
}

/// Session minted by a successful verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedSession {
    /// Opaque session token
    pub token: String,

    /// Authenticated phone
    pub phone: String,

    /// Idle deadline of the new session
    pub expires_at: DateTime<Utc>,
}

/// Result of validating a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SessionStatus {
    /// Token maps to a live session; its idle deadline was refreshed
    Authenticated { phone: String },
    /// Unknown, revoked or idle token
    Unauthenticated,
}

impl SessionStatus {
    /// Whether the token was accepted
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionStatus::Authenticated { .. })
    }

    /// Phone of an authenticated session
    pub fn phone(&self) -> Option<&str> {
        match self {
            SessionStatus::Authenticated { phone } => Some(phone),
            SessionStatus::Unauthenticated => None,
        }
    }

    /// Consume into the phone of an authenticated session
    pub fn into_phone(self) -> Option<String> {
        match self {
            SessionStatus::Authenticated { phone } => Some(phone),
            SessionStatus::Unauthenticated => None,
        }
    }
}
