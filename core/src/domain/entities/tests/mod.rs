//! Unit tests for domain entities

mod verification_challenge_tests;
