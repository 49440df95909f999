//! Flat response records handed to the calling layer (HTTP handlers,
//! webhook handlers). Each mirrors one public operation.

use serde::{Deserialize, Serialize};

use super::auth_outcome::{IssuedCode, SessionStatus, VerifiedSession};
use crate::errors::AuthResult;

/// Outcome of `RequestCode`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestCodeResponse {
    pub ok: bool,
    /// Issued code; the caller delivers it out of band
    pub code: Option<String>,
    /// Machine-readable error code when `ok` is false
    pub error_kind: Option<String>,
    /// Set when the phone is locked out
    pub retry_after_minutes: Option<i64>,
}

impl From<AuthResult<IssuedCode>> for RequestCodeResponse {
    fn from(result: AuthResult<IssuedCode>) -> Self {
        match result {
            Ok(issued) => Self {
                ok: true,
                code: Some(issued.code),
                error_kind: None,
                retry_after_minutes: None,
            },
            Err(error) => Self {
                ok: false,
                code: None,
                error_kind: Some(error.error_code().to_string()),
                retry_after_minutes: error.retry_after_minutes(),
            },
        }
    }
}

/// Outcome of `VerifyCode`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyCodeResponse {
    pub ok: bool,
    pub session_token: Option<String>,
    pub error_kind: Option<String>,
    /// Set on a wrong code that did not lock the phone
    pub remaining_attempts: Option<u32>,
    /// Set when the phone is locked out
    pub retry_after_minutes: Option<i64>,
}

impl From<AuthResult<VerifiedSession>> for VerifyCodeResponse {
    fn from(result: AuthResult<VerifiedSession>) -> Self {
        match result {
            Ok(session) => Self {
                ok: true,
                session_token: Some(session.token),
                error_kind: None,
                remaining_attempts: None,
                retry_after_minutes: None,
            },
            Err(error) => Self {
                ok: false,
                session_token: None,
                error_kind: Some(error.error_code().to_string()),
                remaining_attempts: error.remaining_attempts(),
                retry_after_minutes: error.retry_after_minutes(),
            },
        }
    }
}

/// Outcome of `ValidateSession`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCheckResponse {
    pub authenticated: bool,
    pub phone: Option<String>,
}

impl From<SessionStatus> for SessionCheckResponse {
    fn from(status: SessionStatus) -> Self {
        let authenticated = status.is_authenticated();
        Self {
            authenticated,
            phone: status.into_phone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AuthError;
    use chrono::Utc;

    #[test]
    fn test_request_code_locked_out() {
        let response = RequestCodeResponse::from(Err(AuthError::LockedOut {
            remaining_minutes: 17,
        }));
        assert!(!response.ok);
        assert_eq!(response.code, None);
        assert_eq!(response.error_kind.as_deref(), Some("LOCKED_OUT"));
        assert_eq!(response.retry_after_minutes, Some(17));
    }

    #[test]
    fn test_request_code_ok() {
        let now = Utc::now();
        let response = RequestCodeResponse::from(Ok(IssuedCode {
            phone: "+972501234567".to_string(),
            code: "224466".to_string(),
            issued_at: now,
            expires_at: now,
            replaced_previous: false,
        }));
        assert!(response.ok);
        assert_eq!(response.code.as_deref(), Some("224466"));
        assert_eq!(response.error_kind, None);
    }

    #[test]
    fn test_verify_code_wrong_code() {
        let response = VerifyCodeResponse::from(Err(AuthError::WrongCode {
            remaining_attempts: 2,
        }));
        assert!(!response.ok);
        assert_eq!(response.error_kind.as_deref(), Some("WRONG_CODE"));
        assert_eq!(response.remaining_attempts, Some(2));
        assert_eq!(response.retry_after_minutes, None);
    }

    #[test]
    fn test_session_check() {
        let response = SessionCheckResponse::from(SessionStatus::Authenticated {
            phone: "+972501234567".to_string(),
        });
        assert!(response.authenticated);
        assert_eq!(response.phone.as_deref(), Some("+972501234567"));

        let response = SessionCheckResponse::from(SessionStatus::Unauthenticated);
        assert!(!response.authenticated);
        assert_eq!(response.phone, None);
    }
}
