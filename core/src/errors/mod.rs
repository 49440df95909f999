//! Domain-specific error types and error handling.

mod types;

#[cfg(test)]
mod tests;

pub use types::{extract_english_message, extract_hebrew_message, AuthError};

/// Result alias for every fallible core operation
pub type AuthResult<T> = Result<T, AuthError>;
