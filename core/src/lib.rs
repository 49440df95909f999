//! # WedLedger Core
//!
//! Authentication core for the WedLedger dashboard: one-time codes delivered
//! to a phone, failed-attempt lockout, and sliding sessions. All state lives
//! in memory inside a single [`AuthService`] built at process start.

pub mod clock;
pub mod domain;
pub mod errors;
pub mod services;
pub mod store;

// Re-export commonly used types for convenience
pub use clock::{deadline, Clock, ManualClock, SystemClock};
pub use domain::*;
pub use errors::*;
pub use services::*;
pub use store::{PhoneAuthState, PhoneStateStore};
