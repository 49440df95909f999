//! Value objects representing immutable authentication outcomes.

pub mod auth_outcome;
pub mod auth_response;

// Re-export commonly used types
pub use auth_outcome::{IssuedCode, SessionStatus, VerifiedSession};
pub use auth_response::{RequestCodeResponse, SessionCheckResponse, VerifyCodeResponse};
