use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

static CODE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{6}$").unwrap());

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendCodeRequest {
    /// Canonical (`+972501234567`) or local (`0501234567`) phone number
    #[validate(length(min = 1, max = 20, message = "phone is required"))]
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyCodeRequest {
    /// Same phone the code was requested for
    #[validate(length(min = 1, max = 20, message = "phone is required"))]
    pub phone: String,

    /// 6-digit verification code
    #[validate(regex(path = *CODE_REGEX, message = "code must be exactly 6 digits"))]
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendCodeResponse {
    pub success: bool,
    pub message: String,
    /// The issued code, only in development
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dev_code: Option<String>,
    /// Seconds until the code expires
    pub expires_in: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyCodeResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeResponse {
    pub phone: String,
}
