//! Out-of-band delivery of verification codes.
//!
//! The core only hands back the code; sending it to the user's WhatsApp is
//! done here, off the request path.

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info};
use wl_shared::utils::phone::mask_phone;

/// Failure to hand a code to the messaging provider
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Messaging provider unavailable: {0}")]
    Unavailable(String),
}

/// Sends verification codes to users
#[async_trait]
pub trait CodeSender: Send + Sync {
    /// Deliver `code` to `phone`
    async fn send_code(&self, phone: &str, code: &str) -> Result<(), DeliveryError>;
}

/// Message body sent to the user
pub fn code_message(code: &str, ttl_minutes: i64) -> String {
    format!(
        "🔐 *קוד אימות למערכת הוצאות החתונה*\n\nהקוד שלך: *{}*\n\nהקוד תקף ל-{} דקות.\nאל תשתף קוד זה עם אף אחד.",
        code, ttl_minutes
    )
}

/// Sender that only writes to the log; used when no provider is configured
#[derive(Debug, Clone)]
pub struct LogCodeSender {
    /// Include the rendered message in the log (development only)
    reveal_codes: bool,
    /// Lifetime quoted in the message
    code_ttl_minutes: i64,
}

impl Default for LogCodeSender {
    fn default() -> Self {
        Self::new(false, 10)
    }
}

impl LogCodeSender {
    pub fn new(reveal_codes: bool, code_ttl_minutes: i64) -> Self {
        Self {
            reveal_codes,
            code_ttl_minutes,
        }
    }
}

#[async_trait]
impl CodeSender for LogCodeSender {
    async fn send_code(&self, phone: &str, code: &str) -> Result<(), DeliveryError> {
        if self.reveal_codes {
            debug!(
                phone = %mask_phone(phone),
                message = %code_message(code, self.code_ttl_minutes),
                "Verification code (not delivered)"
            );
        }
        info!(
            event = "code_delivery_skipped",
            phone = %mask_phone(phone),
            "No messaging provider configured; code kept in logs only"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_message_contains_code() {
        let message = code_message("112233", 10);
        assert!(message.contains("*112233*"));
        assert!(message.contains("10 דקות"));
    }

    #[actix_rt::test]
    async fn test_log_sender_always_succeeds() {
        let sender = LogCodeSender::new(true, 10);
        assert!(sender.send_code("+972501234567", "112233").await.is_ok());
    }
}
