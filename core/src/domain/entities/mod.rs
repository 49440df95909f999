//! Domain entities keyed by a canonical phone string or a session token.

pub mod lockout;
pub mod session;
pub mod verification_challenge;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use lockout::LockoutRecord;
pub use session::Session;
pub use verification_challenge::{VerificationChallenge, CODE_LENGTH};
