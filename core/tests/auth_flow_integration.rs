//! Integration tests for the complete login flow

use std::sync::Arc;
use std::thread;

use chrono::Duration;
use wl_core::{
    AuthError, AuthService, ManualClock, RequestCodeResponse, SessionCheckResponse,
    SessionStatus, VerifyCodeResponse,
};
use wl_shared::config::AuthConfig;

const PHONE: &str = "+972501234567";

fn service() -> (Arc<AuthService>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::starting_now());
    let service = AuthService::with_clock(AuthConfig::default(), clock.clone());
    (Arc::new(service), clock)
}

/// Request codes until one differs from `avoid`
fn request_code_other_than(service: &AuthService, avoid: &str) -> String {
    loop {
        let code = service.request_code(PHONE).expect("Failed to request code").code;
        if code != avoid {
            return code;
        }
    }
}

#[test]
fn test_lockout_after_max_wrong_codes() {
    let (service, _) = service();
    let code = request_code_other_than(&service, "000000");

    for remaining in [4, 3, 2, 1] {
        let response = VerifyCodeResponse::from(service.verify_code(PHONE, "000000"));
        assert!(!response.ok);
        assert_eq!(response.error_kind.as_deref(), Some("WRONG_CODE"));
        assert_eq!(response.remaining_attempts, Some(remaining));
    }

    assert_eq!(
        service.verify_code(PHONE, "000000"),
        Err(AuthError::LockedOut {
            remaining_minutes: 30
        })
    );
    assert_eq!(
        service.verify_code(PHONE, &code),
        Err(AuthError::LockedOut {
            remaining_minutes: 30
        })
    );

    let response = RequestCodeResponse::from(service.request_code(PHONE));
    assert!(!response.ok);
    assert_eq!(response.error_kind.as_deref(), Some("LOCKED_OUT"));
    assert_eq!(response.retry_after_minutes, Some(30));
}

#[test]
fn test_lockout_lifts_after_window() {
    let (service, clock) = service();
    let code = request_code_other_than(&service, "000000");
    for _ in 0..5 {
        let _ = service.verify_code(PHONE, "000000");
    }

    clock.advance(Duration::minutes(29) + Duration::seconds(59));
    assert!(matches!(
        service.verify_code(PHONE, &code),
        Err(AuthError::LockedOut {
            remaining_minutes: 1
        })
    ));

    clock.advance(Duration::seconds(1));
    // the lockout discarded the old challenge
    assert_eq!(service.verify_code(PHONE, &code), Err(AuthError::NotFound));

    let fresh = service.request_code(PHONE).expect("Failed to request code");
    assert!(service.verify_code(PHONE, &fresh.code).is_ok());
}

#[test]
fn test_code_expires_without_sweep() {
    let (service, clock) = service();
    let issued = service.request_code(PHONE).expect("Failed to request code");

    clock.advance(Duration::minutes(11));
    assert_eq!(service.verify_code(PHONE, &issued.code), Err(AuthError::Expired));
    assert_eq!(service.verify_code(PHONE, &issued.code), Err(AuthError::NotFound));
}

#[test]
fn test_code_expires_just_after_ttl() {
    let (service, clock) = service();
    let issued = service.request_code(PHONE).expect("Failed to request code");

    clock.advance(Duration::minutes(10) + Duration::milliseconds(1));
    assert_eq!(service.verify_code(PHONE, &issued.code), Err(AuthError::Expired));
}

#[test]
fn test_login_validate_logout() {
    let (service, _) = service();
    let issued = service.request_code(PHONE).expect("Failed to request code");

    let response = VerifyCodeResponse::from(service.verify_code(PHONE, &issued.code));
    assert!(response.ok);
    let token = response.session_token.expect("token on success");

    let check = SessionCheckResponse::from(service.validate_session(&token));
    assert!(check.authenticated);
    assert_eq!(check.phone.as_deref(), Some(PHONE));

    assert!(service.logout(&token));
    let check = SessionCheckResponse::from(service.validate_session(&token));
    assert!(!check.authenticated);
    assert_eq!(check.phone, None);

    // consumed code never verifies again
    assert_eq!(service.verify_code(PHONE, &issued.code), Err(AuthError::NotFound));
}

#[test]
fn test_session_slides_with_activity() {
    let (service, clock) = service();
    let issued = service.request_code(PHONE).expect("Failed to request code");
    let token = service.verify_code(PHONE, &issued.code).expect("Failed to verify").token;

    for _ in 0..3 {
        clock.advance(Duration::minutes(55));
        assert!(service.validate_session(&token).is_authenticated());
    }

    clock.advance(Duration::minutes(61));
    assert_eq!(service.validate_session(&token), SessionStatus::Unauthenticated);
}

#[test]
fn test_reissue_invalidates_previous_code() {
    let (service, _) = service();
    let first = service.request_code(PHONE).expect("Failed to request code").code;
    let second = request_code_other_than(&service, &first);

    let result = service.verify_code(PHONE, &first);
    assert!(matches!(
        result,
        Err(AuthError::NotFound) | Err(AuthError::WrongCode { .. })
    ));
    assert!(service.verify_code(PHONE, &second).is_ok());
}

#[test]
fn test_correct_code_consumed_exactly_once_under_contention() {
    for _ in 0..20 {
        let (service, _) = service();
        let code = service.request_code(PHONE).expect("Failed to request code").code;

        let successes: usize = thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| service.verify_code(PHONE, &code).is_ok()))
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().expect("verifier panicked") as usize)
                .sum()
        });

        assert_eq!(successes, 1);
        assert_eq!(service.sessions().session_count(), 1);
    }
}

#[test]
fn test_logout_final_with_validation_in_flight() {
    let (service, _) = service();

    for _ in 0..20 {
        let code = service.request_code(PHONE).expect("Failed to request code").code;
        let token = service.verify_code(PHONE, &code).expect("Failed to verify").token;

        thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..50 {
                        service.validate_session(&token);
                    }
                });
            }
            scope.spawn(|| service.logout(&token));
        });

        assert_eq!(service.validate_session(&token), SessionStatus::Unauthenticated);
    }
}

#[test]
fn test_lockout_of_one_phone_leaves_others_alone() {
    let (service, _) = service();
    let other = "+972521112233";
    let other_code = service.request_code(other).expect("Failed to request code").code;
    request_code_other_than(&service, "000000");

    for _ in 0..5 {
        let _ = service.verify_code(PHONE, "000000");
    }

    assert!(service.is_blocked(PHONE).expect("lock status").is_locked());
    assert!(!service.is_blocked(other).expect("lock status").is_locked());
    assert!(service.verify_code(other, &other_code).is_ok());
}

#[tokio::test]
async fn test_concurrent_phones_on_runtime() {
    let (service, _) = service();

    let tasks: Vec<_> = (0..16)
        .map(|i| {
            let service = Arc::clone(&service);
            tokio::spawn(async move {
                let phone = format!("+97250000{:04}", i);
                let code = service.request_code(&phone)?.code;
                service.verify_code(&phone, &code).map(|session| session.phone)
            })
        })
        .collect();

    for task in tasks {
        let phone = task.await.expect("task panicked").expect("login failed");
        assert!(phone.starts_with("+97250000"));
    }
    assert_eq!(service.sessions().session_count(), 16);
}
