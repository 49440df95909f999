//! Brute-force protection for verification codes.
//!
//! Counts wrong codes per phone and locks the phone out for a fixed window
//! once the limit is reached. The counter lives on the phone record, not the
//! challenge, so requesting a fresh code does not reset it.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use wl_shared::config::OtpConfig;
use wl_shared::utils::phone::mask_phone;

use crate::clock::Clock;
use crate::domain::entities::LockoutRecord;
use crate::errors::{AuthError, AuthResult};
use crate::store::{PhoneAuthState, PhoneStateStore};

/// Whether a phone may currently request or verify codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LockStatus {
    Open,
    Locked { remaining_minutes: i64 },
}

impl LockStatus {
    pub fn is_locked(&self) -> bool {
        matches!(self, LockStatus::Locked { .. })
    }
}

/// What a recorded failure led to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FailureOutcome {
    WrongCode { remaining_attempts: u32 },
    LockedOut { minutes: i64 },
}

impl From<FailureOutcome> for AuthError {
    fn from(outcome: FailureOutcome) -> Self {
        match outcome {
            FailureOutcome::WrongCode { remaining_attempts } => {
                AuthError::WrongCode { remaining_attempts }
            }
            FailureOutcome::LockedOut { minutes } => AuthError::LockedOut {
                remaining_minutes: minutes,
            },
        }
    }
}

/// Attempt counters and lockout of a phone
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptInfo {
    /// Wrong codes counted towards the lockout
    pub failed_attempts: u32,
    /// Wrong codes against the pending challenge, if one exists
    pub challenge_attempts: Option<u32>,
    /// End of the active lockout, if any
    pub blocked_until: Option<DateTime<Utc>>,
    /// Attempts left before the phone is locked
    pub remaining_attempts: u32,
}

/// Tracks failed attempts and lockouts per phone
#[derive(Clone)]
pub struct AttemptGuard {
    store: Arc<PhoneStateStore>,
    clock: Arc<dyn Clock>,
    config: OtpConfig,
}

impl AttemptGuard {
    /// Create a guard over the shared phone store
    pub fn new(store: Arc<PhoneStateStore>, clock: Arc<dyn Clock>, config: OtpConfig) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    /// Check whether `phone` is locked out.
    ///
    /// A lockout whose window has passed is cleared and the counter reset.
    pub fn is_blocked(&self, phone: &str) -> AuthResult<LockStatus> {
        let now = self.clock.now();
        let status = self
            .store
            .with_existing(phone, |state| Ok(self.check_lock(state, now)))?;
        Ok(status.unwrap_or(LockStatus::Open))
    }

    /// Count a wrong code for `phone`, locking it out at the limit
    pub fn record_failure(&self, phone: &str) -> AuthResult<FailureOutcome> {
        let now = self.clock.now();
        let outcome = self
            .store
            .with_phone(phone, |state| Ok(self.register_failure(state, now)))?;
        self.log_failure(phone, outcome);
        Ok(outcome)
    }

    /// Clear the counter after a successful verification
    pub fn reset(&self, phone: &str) -> AuthResult<()> {
        self.store
            .with_existing(phone, |state| {
                state.clear_failures();
                Ok(())
            })
            .map(|_| ())
    }

    /// Counters and lockout of `phone`
    pub fn lock_info(&self, phone: &str) -> AuthResult<AttemptInfo> {
        let now = self.clock.now();
        let info = self.store.with_existing(phone, |state| {
            // refresh an elapsed lockout before reporting
            self.check_lock(state, now);
            Ok(AttemptInfo {
                failed_attempts: state.failed_attempts,
                challenge_attempts: state.challenge.as_ref().map(|c| c.attempt_count),
                blocked_until: state.lockout.map(|l| l.blocked_until),
                remaining_attempts: self.remaining_attempts(state),
            })
        })?;

        Ok(info.unwrap_or_else(|| AttemptInfo {
            remaining_attempts: self.config.max_attempts,
            ..AttemptInfo::default()
        }))
    }

    /// Lift a lockout before its window ends. Returns whether one was active.
    pub fn unlock(&self, phone: &str) -> AuthResult<bool> {
        let now = self.clock.now();
        let was_locked = self
            .store
            .with_existing(phone, |state| {
                let was_locked = state.lockout.map_or(false, |l| l.is_active(now));
                state.lockout = None;
                state.clear_failures();
                Ok(was_locked)
            })?
            .unwrap_or(false);

        if was_locked {
            info!(event = "lockout_lifted", phone = %mask_phone(phone), "Phone manually unlocked");
        }
        Ok(was_locked)
    }

    /// Lockout duration
    pub fn lockout_duration(&self) -> Duration {
        self.config.lockout_duration()
    }

    /// Lock check on an already-locked phone record.
    ///
    /// Also expires an elapsed lockout and a failure counter left idle for a
    /// full lockout window.
    pub(crate) fn check_lock(&self, state: &mut PhoneAuthState, now: DateTime<Utc>) -> LockStatus {
        if let Some(lockout) = state.lockout.filter(|l| l.is_active(now)) {
            return LockStatus::Locked {
                remaining_minutes: lockout.remaining_minutes(now),
            };
        }
        state.expire_lockout(now);
        state.expire_stale_failures(now, self.lockout_duration());
        LockStatus::Open
    }

    /// Failure accounting on an already-locked phone record
    pub(crate) fn register_failure(
        &self,
        state: &mut PhoneAuthState,
        now: DateTime<Utc>,
    ) -> FailureOutcome {
        if let LockStatus::Locked { remaining_minutes } = self.check_lock(state, now) {
            return FailureOutcome::LockedOut {
                minutes: remaining_minutes,
            };
        }

        state.note_failure(now);

        if state.failed_attempts >= self.config.max_attempts {
            let lockout = LockoutRecord::new(now, self.lockout_duration());
            state.lockout = Some(lockout);
            state.challenge = None;
            return FailureOutcome::LockedOut {
                minutes: lockout.remaining_minutes(now),
            };
        }

        FailureOutcome::WrongCode {
            remaining_attempts: self.remaining_attempts(state),
        }
    }

    pub(crate) fn log_failure(&self, phone: &str, outcome: FailureOutcome) {
        match outcome {
            FailureOutcome::WrongCode { remaining_attempts } => info!(
                event = "wrong_code",
                phone = %mask_phone(phone),
                remaining_attempts,
                "Wrong verification code"
            ),
            FailureOutcome::LockedOut { minutes } => warn!(
                event = "phone_locked",
                phone = %mask_phone(phone),
                minutes,
                "Phone locked out after too many wrong codes"
            ),
        }
    }

    fn remaining_attempts(&self, state: &PhoneAuthState) -> u32 {
        self.config.max_attempts.saturating_sub(state.failed_attempts)
    }
}
