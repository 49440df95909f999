//! Business services containing the authentication use cases.

pub mod auth;
pub mod cleanup;
pub mod session;
pub mod verification;

// Re-export commonly used types
pub use auth::{AttemptGuard, AttemptInfo, AuthService, FailureOutcome, LockStatus};
pub use cleanup::{AuthCleanupService, CleanupResult};
pub use session::{generate_session_token, SessionStore};
pub use verification::{normalize_code_length, CodeGenerator, CodeIssuer, CodePattern};
