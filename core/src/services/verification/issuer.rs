//! Issues one-time codes to phones.

use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, info, warn};
use wl_shared::config::OtpConfig;
use wl_shared::utils::phone::mask_phone;

use super::code_generator::CodeGenerator;
use crate::clock::Clock;
use crate::domain::entities::VerificationChallenge;
use crate::domain::value_objects::IssuedCode;
use crate::errors::{AuthError, AuthResult};
use crate::services::auth::{AttemptGuard, LockStatus};
use crate::store::{PhoneAuthState, PhoneStateStore};

/// Creates and stores verification challenges
#[derive(Clone)]
pub struct CodeIssuer {
    store: Arc<PhoneStateStore>,
    clock: Arc<dyn Clock>,
    guard: AttemptGuard,
    generator: CodeGenerator,
    config: OtpConfig,
    log_codes: bool,
}

impl CodeIssuer {
    /// Create an issuer sharing the store and clock with the attempt guard
    pub fn new(
        store: Arc<PhoneStateStore>,
        clock: Arc<dyn Clock>,
        guard: AttemptGuard,
        config: OtpConfig,
    ) -> Self {
        Self {
            store,
            clock,
            guard,
            generator: CodeGenerator::new(config.code_length),
            config,
            log_codes: false,
        }
    }

    /// Emit issued codes at debug level (development only)
    pub fn with_code_logging(mut self, enabled: bool) -> Self {
        self.log_codes = enabled;
        self
    }

    /// Issue a new code for `phone`, replacing any pending one.
    ///
    /// # Returns
    /// * `Ok(IssuedCode)` - The code and its expiry; delivery is up to the caller
    /// * `Err(AuthError::LockedOut)` - The phone is inside its lockout window
    pub fn issue(&self, phone: &str) -> AuthResult<IssuedCode> {
        let issued = self
            .store
            .with_phone(phone, |state| self.issue_locked(phone, state))?;

        info!(
            event = "code_issued",
            phone = %mask_phone(phone),
            expires_at = %issued.expires_at,
            replaced_previous = issued.replaced_previous,
            "Verification code issued"
        );
        if self.log_codes {
            debug!(phone = %mask_phone(phone), code = %issued.code, "Development code");
        }

        Ok(issued)
    }

    /// Snapshot of the pending challenge, if any
    pub fn pending_challenge(&self, phone: &str) -> AuthResult<Option<VerificationChallenge>> {
        Ok(self
            .store
            .with_existing(phone, |state| Ok(state.challenge.clone()))?
            .flatten())
    }

    /// Code lifetime
    pub fn code_ttl(&self) -> Duration {
        self.config.code_ttl()
    }

    fn issue_locked(&self, phone: &str, state: &mut PhoneAuthState) -> AuthResult<IssuedCode> {
        let now = self.clock.now();

        if let LockStatus::Locked { remaining_minutes } = self.guard.check_lock(state, now) {
            warn!(
                event = "code_request_blocked",
                phone = %mask_phone(phone),
                remaining_minutes,
                "Code requested for a locked phone"
            );
            return Err(AuthError::LockedOut { remaining_minutes });
        }

        let challenge = VerificationChallenge::new(self.generator.generate(), now);
        let issued = IssuedCode {
            phone: phone.to_string(),
            code: challenge.code.clone(),
            issued_at: now,
            expires_at: challenge.expires_at(self.code_ttl()),
            replaced_previous: state.challenge.is_some(),
        };
        state.challenge = Some(challenge);

        Ok(issued)
    }
}
