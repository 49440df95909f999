//! Authentication error taxonomy with bilingual messages (English and Hebrew)

use thiserror::Error;
use wl_shared::errors::{error_codes, ErrorResponse, IntoErrorResponse};

/// Every failure the authentication core can report
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Malformed input, rejected before any state is touched
    #[error("Invalid {field}: {reason} | ערך לא תקין בשדה {field}: {reason}")]
    Validation { field: String, reason: String },

    /// The phone is inside its lockout window; callers must not auto-retry
    #[error("Too many attempts. Try again in {remaining_minutes} minutes | המספר חסום עוד {remaining_minutes} דקות")]
    LockedOut { remaining_minutes: i64 },

    /// No pending challenge for the phone
    #[error("No verification code found for this phone | לא נמצא קוד למספר זה")]
    NotFound,

    /// The pending challenge aged out
    #[error("Verification code expired | הקוד פג תוקף")]
    Expired,

    /// Mismatch; recoverable until it escalates to a lockout
    #[error("Wrong verification code. {remaining_attempts} attempts remaining | קוד שגוי. נותרו {remaining_attempts} ניסיונות")]
    WrongCode { remaining_attempts: u32 },

    /// Missing, revoked or idle session
    #[error("Session expired. Please log in again | פג תוקף ההתחברות, יש להתחבר מחדש")]
    SessionExpired,

    /// A storage or token invariant was violated
    #[error("Internal error: {message} | שגיאה פנימית")]
    Internal { message: String },
}

impl AuthError {
    /// Build a validation error for `field`
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        AuthError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Build an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        AuthError::Internal {
            message: message.into(),
        }
    }

    /// Stable machine-readable code
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::Validation { .. } => error_codes::VALIDATION_ERROR,
            AuthError::LockedOut { .. } => error_codes::LOCKED_OUT,
            AuthError::NotFound => error_codes::CODE_NOT_FOUND,
            AuthError::Expired => error_codes::CODE_EXPIRED,
            AuthError::WrongCode { .. } => error_codes::WRONG_CODE,
            AuthError::SessionExpired => error_codes::SESSION_EXPIRED,
            AuthError::Internal { .. } => error_codes::INTERNAL_ERROR,
        }
    }

    /// Whether the caller may try again without waiting for a lockout window
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, AuthError::LockedOut { .. } | AuthError::Internal { .. })
    }

    /// Minutes until a lockout lifts, if this is a lockout
    pub fn retry_after_minutes(&self) -> Option<i64> {
        match self {
            AuthError::LockedOut { remaining_minutes } => Some(*remaining_minutes),
            _ => None,
        }
    }

    /// Attempts left before a lockout, if this is a wrong code
    pub fn remaining_attempts(&self) -> Option<u32> {
        match self {
            AuthError::WrongCode { remaining_attempts } => Some(*remaining_attempts),
            _ => None,
        }
    }
}

impl IntoErrorResponse for AuthError {
    fn to_error_response(&self) -> ErrorResponse {
        let mut response = ErrorResponse::new(self.error_code(), self.to_string());
        match self {
            AuthError::LockedOut { remaining_minutes } => {
                response = response.add_detail("retry_after_minutes", remaining_minutes);
            }
            AuthError::WrongCode { remaining_attempts } => {
                response = response.add_detail("remaining_attempts", remaining_attempts);
            }
            AuthError::Validation { field, .. } => {
                response = response.add_detail("field", field);
            }
            // internal details stay in the logs
            AuthError::Internal { .. } => {
                response.message = String::from("Internal error | שגיאה פנימית");
            }
            _ => {}
        }
        response
    }
}

/// Extract the English half of a bilingual message
pub fn extract_english_message(message: &str) -> &str {
    message.split(" | ").next().unwrap_or(message)
}

/// Extract the Hebrew half of a bilingual message
pub fn extract_hebrew_message(message: &str) -> &str {
    message.split(" | ").nth(1).unwrap_or(message)
}
