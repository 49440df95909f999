//! Domain layer containing authentication entities and value objects.

pub mod entities;
pub mod value_objects;

// Re-export commonly used domain types
pub use entities::{LockoutRecord, Session, VerificationChallenge, CODE_LENGTH};
pub use value_objects::{
    IssuedCode, RequestCodeResponse, SessionCheckResponse, SessionStatus, VerifiedSession,
    VerifyCodeResponse,
};
