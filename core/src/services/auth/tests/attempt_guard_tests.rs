//! Unit tests for failed-attempt accounting and lockout

use std::sync::Arc;

use chrono::Duration;
use wl_shared::config::OtpConfig;

use crate::clock::ManualClock;
use crate::errors::AuthError;
use crate::services::auth::{AttemptGuard, FailureOutcome, LockStatus};
use crate::services::verification::CodeIssuer;
use crate::store::PhoneStateStore;

const PHONE: &str = "+972501234567";

fn fixture() -> (AttemptGuard, CodeIssuer, Arc<ManualClock>) {
    let store = Arc::new(PhoneStateStore::new());
    let clock = Arc::new(ManualClock::starting_now());
    let config = OtpConfig::default();
    let guard = AttemptGuard::new(Arc::clone(&store), clock.clone(), config.clone());
    let issuer = CodeIssuer::new(store, clock.clone(), guard.clone(), config);
    (guard, issuer, clock)
}

#[test]
fn test_unknown_phone_is_open() {
    let (guard, _, _) = fixture();
    assert_eq!(guard.is_blocked(PHONE).unwrap(), LockStatus::Open);

    let info = guard.lock_info(PHONE).unwrap();
    assert_eq!(info.failed_attempts, 0);
    assert_eq!(info.remaining_attempts, 5);
    assert_eq!(info.blocked_until, None);
}

#[test]
fn test_failures_count_down_then_lock() {
    let (guard, issuer, _) = fixture();
    issuer.issue(PHONE).unwrap();

    for expected in (1..=4).rev() {
        assert_eq!(
            guard.record_failure(PHONE).unwrap(),
            FailureOutcome::WrongCode {
                remaining_attempts: expected
            }
        );
    }
    let info = guard.lock_info(PHONE).unwrap();
    assert_eq!(info.challenge_attempts, Some(4));

    assert_eq!(
        guard.record_failure(PHONE).unwrap(),
        FailureOutcome::LockedOut { minutes: 30 }
    );
    assert_eq!(
        guard.is_blocked(PHONE).unwrap(),
        LockStatus::Locked {
            remaining_minutes: 30
        }
    );
    // the challenge is discarded on lockout
    assert_eq!(issuer.pending_challenge(PHONE).unwrap(), None);
}

#[test]
fn test_failure_while_locked_reports_lockout() {
    let (guard, _, clock) = fixture();
    for _ in 0..5 {
        guard.record_failure(PHONE).unwrap();
    }
    clock.advance(Duration::minutes(10));

    assert_eq!(
        guard.record_failure(PHONE).unwrap(),
        FailureOutcome::LockedOut { minutes: 20 }
    );
}

#[test]
fn test_remaining_minutes_round_up() {
    let (guard, _, clock) = fixture();
    for _ in 0..5 {
        guard.record_failure(PHONE).unwrap();
    }

    clock.advance(Duration::minutes(29) + Duration::seconds(50));
    assert_eq!(
        guard.is_blocked(PHONE).unwrap(),
        LockStatus::Locked {
            remaining_minutes: 1
        }
    );
}

#[test]
fn test_lockout_expires_and_resets_counter() {
    let (guard, _, clock) = fixture();
    for _ in 0..5 {
        guard.record_failure(PHONE).unwrap();
    }

    clock.advance(Duration::minutes(30));
    assert_eq!(guard.is_blocked(PHONE).unwrap(), LockStatus::Open);

    let info = guard.lock_info(PHONE).unwrap();
    assert_eq!(info.failed_attempts, 0);
    assert_eq!(info.blocked_until, None);
    assert_eq!(
        guard.record_failure(PHONE).unwrap(),
        FailureOutcome::WrongCode {
            remaining_attempts: 4
        }
    );
}

#[test]
fn test_reissuing_does_not_reset_counter() {
    let (guard, issuer, _) = fixture();
    issuer.issue(PHONE).unwrap();
    guard.record_failure(PHONE).unwrap();
    guard.record_failure(PHONE).unwrap();

    issuer.issue(PHONE).unwrap();

    let info = guard.lock_info(PHONE).unwrap();
    assert_eq!(info.failed_attempts, 2);
    assert_eq!(info.challenge_attempts, Some(0));
}

#[test]
fn test_idle_counter_expires_after_lockout_window() {
    let (guard, _, clock) = fixture();
    for _ in 0..3 {
        guard.record_failure(PHONE).unwrap();
    }

    clock.advance(Duration::minutes(29));
    assert_eq!(guard.lock_info(PHONE).unwrap().failed_attempts, 3);

    // a new failure restarts the idle window
    assert_eq!(
        guard.record_failure(PHONE).unwrap(),
        FailureOutcome::WrongCode {
            remaining_attempts: 1
        }
    );
    clock.advance(Duration::minutes(29));
    assert_eq!(guard.lock_info(PHONE).unwrap().failed_attempts, 4);

    clock.advance(Duration::minutes(1));
    assert_eq!(guard.is_blocked(PHONE).unwrap(), LockStatus::Open);
    assert_eq!(guard.lock_info(PHONE).unwrap().failed_attempts, 0);
    assert_eq!(
        guard.record_failure(PHONE).unwrap(),
        FailureOutcome::WrongCode {
            remaining_attempts: 4
        }
    );
}

#[test]
fn test_reset_clears_counter() {
    let (guard, _, _) = fixture();
    guard.record_failure(PHONE).unwrap();
    guard.record_failure(PHONE).unwrap();

    guard.reset(PHONE).unwrap();
    assert_eq!(guard.lock_info(PHONE).unwrap().failed_attempts, 0);
}

#[test]
fn test_manual_unlock() {
    let (guard, _, _) = fixture();
    assert!(!guard.unlock(PHONE).unwrap());

    for _ in 0..5 {
        guard.record_failure(PHONE).unwrap();
    }
    assert!(guard.unlock(PHONE).unwrap());
    assert_eq!(guard.is_blocked(PHONE).unwrap(), LockStatus::Open);
}

#[test]
fn test_outcome_into_error() {
    let error: AuthError = FailureOutcome::WrongCode {
        remaining_attempts: 3,
    }
    .into();
    assert_eq!(error, AuthError::WrongCode { remaining_attempts: 3 });

    let error: AuthError = FailureOutcome::LockedOut { minutes: 30 }.into();
    assert_eq!(error, AuthError::LockedOut { remaining_minutes: 30 });
}

#[test]
fn test_custom_limits() {
    let store = Arc::new(PhoneStateStore::new());
    let clock = Arc::new(ManualClock::starting_now());
    let config = OtpConfig {
        max_attempts: 2,
        lockout_duration_seconds: 90,
        ..OtpConfig::default()
    };
    let guard = AttemptGuard::new(store, clock, config);

    assert_eq!(
        guard.record_failure(PHONE).unwrap(),
        FailureOutcome::WrongCode {
            remaining_attempts: 1
        }
    );
    assert_eq!(
        guard.record_failure(PHONE).unwrap(),
        FailureOutcome::LockedOut { minutes: 2 }
    );
}
