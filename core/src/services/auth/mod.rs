//! Authentication service module
//!
//! This module ties the pieces of the login flow together:
//! - Code issuing and verification
//! - Failed-attempt counting and lockout
//! - Session minting on success

mod attempt_guard;
mod service;

#[cfg(test)]
mod tests;

pub use attempt_guard::{AttemptGuard, AttemptInfo, FailureOutcome, LockStatus};
pub use service::AuthService;
