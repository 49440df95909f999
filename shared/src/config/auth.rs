//! Authentication configuration: OTP challenges, lockout, sessions and cleanup

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Upper bound for every configured duration (one year)
pub const MAX_DURATION_SECONDS: i64 = 365 * 24 * 60 * 60;

/// One-time code configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OtpConfig {
    /// Failed verifications before the phone is locked out
    pub max_attempts: u32,

    /// Lifetime of an issued code in seconds
    pub code_ttl_seconds: i64,

    /// Lockout window in seconds
    pub lockout_duration_seconds: i64,

    /// Number of digits in a code
    #[serde(default = "default_code_length")]
    pub code_length: usize,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            code_ttl_seconds: 600,          // 10 minutes
            lockout_duration_seconds: 1800, // 30 minutes
            code_length: default_code_length(),
        }
    }
}

impl OtpConfig {
    /// Lifetime of an issued code
    pub fn code_ttl(&self) -> Duration {
        bounded_duration(self.code_ttl_seconds)
    }

    /// Lockout window; also how long an idle failure counter is remembered
    pub fn lockout_duration(&self) -> Duration {
        bounded_duration(self.lockout_duration_seconds)
    }
}

/// Session configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Idle timeout in seconds (sliding)
    pub duration_seconds: i64,

    /// Session cookie name
    pub cookie_name: String,

    /// Session cookie secure flag (HTTPS only)
    pub secure: bool,

    /// Session cookie SameSite attribute
    pub same_site: String,

    /// Session cookie HttpOnly flag
    #[serde(default = "default_http_only")]
    pub http_only: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            duration_seconds: 3600, // 1 hour
            cookie_name: String::from("session_token"),
            secure: true,
            same_site: String::from("Lax"),
            http_only: default_http_only(),
        }
    }
}

impl SessionConfig {
    /// Idle timeout of a session
    pub fn duration(&self) -> Duration {
        bounded_duration(self.duration_seconds)
    }
}

/// Background sweep configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CleanupConfig {
    /// How often to run the sweep (in seconds)
    pub interval_seconds: u64,

    /// Whether to run the sweep at all
    pub enabled: bool,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 60,
            enabled: true,
        }
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct AuthConfig {
    /// OTP configuration
    #[serde(default)]
    pub otp: OtpConfig,

    /// Session configuration
    #[serde(default)]
    pub session: SessionConfig,

    /// Cleanup configuration
    #[serde(default)]
    pub cleanup: CleanupConfig,
}

impl AuthConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok(), Self::default())
    }

    /// Overlay variables found through `lookup` on top of `base`.
    /// Values that fail to parse or fall out of range keep the base value.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>, base: Self) -> Self {
        let parse = |key: &str| lookup(key).and_then(|v| v.trim().parse::<i64>().ok());

        let seconds = |key: &str| parse(key).filter(|v| (1..=MAX_DURATION_SECONDS).contains(v));

        let mut config = base;
        if let Some(v) = parse("OTP_MAX_ATTEMPTS")
            .filter(|v| *v > 0)
            .and_then(|v| u32::try_from(v).ok())
        {
            config.otp.max_attempts = v;
        }
        if let Some(v) = seconds("OTP_CODE_TTL_SECONDS") {
            config.otp.code_ttl_seconds = v;
        }
        if let Some(v) = seconds("OTP_LOCKOUT_SECONDS") {
            config.otp.lockout_duration_seconds = v;
        }
        if let Some(v) = seconds("SESSION_DURATION_SECONDS") {
            config.session.duration_seconds = v;
        }
        if let Some(v) = lookup("SESSION_COOKIE_SECURE") {
            config.session.secure = matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes");
        }
        if let Some(v) = parse("CLEANUP_INTERVAL_SECONDS")
            .filter(|v| *v > 0)
            .and_then(|v| u64::try_from(v).ok())
        {
            config.cleanup.interval_seconds = v;
        }
        if let Some(v) = lookup("CLEANUP_ENABLED") {
            config.cleanup.enabled = !matches!(v.trim().to_lowercase().as_str(), "0" | "false" | "no");
        }
        config
    }
}

/// Seconds to a `Duration`, clamped to `0..=MAX_DURATION_SECONDS`
fn bounded_duration(seconds: i64) -> Duration {
    Duration::try_seconds(seconds.clamp(0, MAX_DURATION_SECONDS)).unwrap_or_else(Duration::zero)
}

fn default_code_length() -> usize {
    6
}

fn default_http_only() -> bool {
    true
}
