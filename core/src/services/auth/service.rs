//! Main authentication service implementation

use std::sync::Arc;

use tracing::{debug, info, warn};
use wl_shared::config::AuthConfig;
use wl_shared::utils::phone::mask_phone;

use super::attempt_guard::{AttemptGuard, LockStatus};
use crate::clock::{deadline, Clock, SystemClock};
use crate::domain::value_objects::{IssuedCode, SessionStatus, VerifiedSession};
use crate::errors::{AuthError, AuthResult};
use crate::services::cleanup::AuthCleanupService;
use crate::services::session::SessionStore;
use crate::services::verification::CodeIssuer;
use crate::store::{PhoneAuthState, PhoneStateStore};

/// Entry point of the authentication core.
///
/// Built once at start-up and shared (behind an `Arc`) by every request
/// handler. Owns all authentication state; nothing lives in globals.
pub struct AuthService {
    /// Per-phone challenges, counters and lockouts
    store: Arc<PhoneStateStore>,
    /// Time source for every expiry decision
    clock: Arc<dyn Clock>,
    /// Failed-attempt accounting
    guard: AttemptGuard,
    /// Code issuing
    issuer: CodeIssuer,
    /// Token -> session registry
    sessions: Arc<SessionStore>,
    /// Service configuration
    config: AuthConfig,
}

impl AuthService {
    /// Create a service running on the wall clock
    pub fn new(config: AuthConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a service with a custom time source
    pub fn with_clock(config: AuthConfig, clock: Arc<dyn Clock>) -> Self {
        let store = Arc::new(PhoneStateStore::new());
        let guard = AttemptGuard::new(Arc::clone(&store), Arc::clone(&clock), config.otp.clone());
        let issuer = CodeIssuer::new(
            Arc::clone(&store),
            Arc::clone(&clock),
            guard.clone(),
            config.otp.clone(),
        );
        let sessions = Arc::new(SessionStore::new(Arc::clone(&clock), config.session.clone()));

        Self {
            store,
            clock,
            guard,
            issuer,
            sessions,
            config,
        }
    }

    /// Log issued codes at debug level; only for development
    pub fn with_code_logging(mut self, enabled: bool) -> Self {
        self.issuer = self.issuer.with_code_logging(enabled);
        self
    }

    /// Issue a one-time code for `phone`
    ///
    /// # Returns
    /// * `Ok(IssuedCode)` - Code to be delivered by the caller
    /// * `Err(AuthError::Validation)` - Empty phone
    /// * `Err(AuthError::LockedOut)` - Phone is locked out
    pub fn request_code(&self, phone: &str) -> AuthResult<IssuedCode> {
        validate_phone(phone)?;
        self.issuer.issue(phone)
    }

    /// Verify a submitted code and mint a session on success
    ///
    /// Every step runs under one acquisition of the phone's lock, so two
    /// concurrent submissions of the right code yield exactly one session.
    ///
    /// # Returns
    /// * `Ok(VerifiedSession)` - Fresh session token
    /// * `Err(AuthError::LockedOut)` - Locked before or by this attempt
    /// * `Err(AuthError::NotFound)` - No pending code
    /// * `Err(AuthError::Expired)` - Pending code aged out; it is discarded
    /// * `Err(AuthError::WrongCode)` - Mismatch, with attempts left
    pub fn verify_code(&self, phone: &str, code: &str) -> AuthResult<VerifiedSession> {
        validate_phone(phone)?;
        self.validate_code_format(code)?;

        let verified = self
            .store
            .with_existing(phone, |state| self.verify_locked(phone, code, state))?;

        match verified {
            Some(session) => {
                info!(event = "code_verified", phone = %mask_phone(phone), "Phone verified");
                Ok(session)
            }
            None => {
                debug!(event = "code_not_found", phone = %mask_phone(phone), "No pending code");
                Err(AuthError::NotFound)
            }
        }
    }

    /// Check a session token, refreshing its idle deadline
    pub fn validate_session(&self, token: &str) -> SessionStatus {
        if token.is_empty() {
            return SessionStatus::Unauthenticated;
        }
        self.sessions.validate(token)
    }

    /// End a session. Idempotent; returns whether a session existed.
    pub fn logout(&self, token: &str) -> bool {
        if token.is_empty() {
            return false;
        }
        self.sessions.invalidate(token)
    }

    /// Current lockout status of `phone`
    pub fn is_blocked(&self, phone: &str) -> AuthResult<LockStatus> {
        self.guard.is_blocked(phone)
    }

    /// Failed-attempt accounting
    pub fn attempt_guard(&self) -> &AttemptGuard {
        &self.guard
    }

    /// Code issuing
    pub fn code_issuer(&self) -> &CodeIssuer {
        &self.issuer
    }

    /// Session registry
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Number of phone records held in memory
    pub fn tracked_phones(&self) -> usize {
        self.store.len()
    }

    /// Service configuration
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Cleanup service sweeping this service's state
    pub fn cleanup_service(&self) -> AuthCleanupService {
        AuthCleanupService::new(
            Arc::clone(&self.store),
            Arc::clone(&self.sessions),
            Arc::clone(&self.clock),
            self.config.otp.clone(),
            self.config.cleanup.clone(),
        )
    }

    fn verify_locked(
        &self,
        phone: &str,
        code: &str,
        state: &mut PhoneAuthState,
    ) -> AuthResult<VerifiedSession> {
        let now = self.clock.now();

        if let LockStatus::Locked { remaining_minutes } = self.guard.check_lock(state, now) {
            warn!(
                event = "verify_blocked",
                phone = %mask_phone(phone),
                remaining_minutes,
                "Verification attempted on a locked phone"
            );
            return Err(AuthError::LockedOut { remaining_minutes });
        }

        let challenge = state.challenge.as_ref().ok_or(AuthError::NotFound)?;

        if challenge.is_expired(now, self.config.otp.code_ttl()) {
            state.challenge = None;
            info!(event = "code_expired", phone = %mask_phone(phone), "Verification code expired");
            return Err(AuthError::Expired);
        }

        if !challenge.matches(code) {
            let outcome = self.guard.register_failure(state, now);
            self.guard.log_failure(phone, outcome);
            return Err(outcome.into());
        }

        // Mint before consuming so a failed mint leaves the code usable
        let token = self.sessions.create(phone)?;
        state.challenge = None;
        state.clear_failures();

        Ok(VerifiedSession {
            token,
            phone: phone.to_string(),
            expires_at: deadline(now, self.sessions.session_duration()),
        })
    }

    fn validate_code_format(&self, code: &str) -> AuthResult<()> {
        let length = self.config.otp.code_length;
        if code.len() != length || !code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AuthError::validation(
                "code",
                format!("must be exactly {} digits", length),
            ));
        }
        Ok(())
    }
}

fn validate_phone(phone: &str) -> AuthResult<()> {
    if phone.trim().is_empty() {
        return Err(AuthError::validation("phone", "must not be empty"));
    }
    Ok(())
}
