//! Unit tests for verification challenge entity

use chrono::{Duration, Utc};

use crate::domain::entities::verification_challenge::VerificationChallenge;

#[test]
fn test_new_challenge_has_no_attempts() {
    let now = Utc::now();
    let challenge = VerificationChallenge::new("224466".to_string(), now);

    assert_eq!(challenge.code, "224466");
    assert_eq!(challenge.created_at, now);
    assert_eq!(challenge.attempt_count, 0);
}

#[test]
fn test_expiry_boundary() {
    let now = Utc::now();
    let ttl = Duration::minutes(10);
    let challenge = VerificationChallenge::new("111222".to_string(), now);

    assert!(!challenge.is_expired(now + Duration::minutes(9), ttl));
    // exactly at the TTL the code is still accepted
    assert!(!challenge.is_expired(now + ttl, ttl));
    assert!(challenge.is_expired(now + ttl + Duration::milliseconds(1), ttl));
    assert_eq!(challenge.expires_at(ttl), now + ttl);
}

#[test]
fn test_matches() {
    let challenge = VerificationChallenge::new("121212".to_string(), Utc::now());

    assert!(challenge.matches("121212"));
    assert!(!challenge.matches("121213"));
    assert!(!challenge.matches("12121"));
    assert!(!challenge.matches(""));
}
