//! Shared utilities and common types for the WedLedger server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types
//! - Error response structures
//! - Utility functions (phone validation and masking)

pub mod config;
pub mod errors;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, CleanupConfig, Environment, LogFormat, LoggingConfig, OtpConfig,
    ServerConfig, SessionConfig,
};
pub use errors::{error_codes, ErrorResponse, IntoErrorResponse};
pub use utils::phone;
