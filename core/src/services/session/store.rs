//! In-memory session registry.
//!
//! Tokens are random, unguessable and never reused. Validation refreshes the
//! idle deadline; a session idle for the full session duration is gone.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};
use tracing::{debug, error, info};
use wl_shared::config::SessionConfig;
use wl_shared::utils::phone::mask_phone;

use crate::clock::Clock;
use crate::domain::entities::Session;
use crate::domain::value_objects::SessionStatus;
use crate::errors::{AuthError, AuthResult};

/// Derive a 64-character hex token for `phone`
///
/// SHA-256 over the phone, the issue time and 16 bytes from the OS CSPRNG.
pub fn generate_session_token(phone: &str, now: DateTime<Utc>) -> String {
    let mut nonce = [0u8; 16];
    OsRng.fill_bytes(&mut nonce);

    let mut hasher = Sha256::new();
    hasher.update(format!("{}:{}:{}", phone, now.to_rfc3339(), hex::encode(nonce)).as_bytes());
    hex::encode(hasher.finalize())
}

/// Token -> session map
pub struct SessionStore {
    sessions: DashMap<String, Session>,
    clock: Arc<dyn Clock>,
    config: SessionConfig,
}

impl SessionStore {
    pub fn new(clock: Arc<dyn Clock>, config: SessionConfig) -> Self {
        Self {
            sessions: DashMap::new(),
            clock,
            config,
        }
    }

    /// Idle timeout of a session
    pub fn session_duration(&self) -> Duration {
        self.config.duration()
    }

    /// Mint a session for `phone` and return its token
    pub fn create(&self, phone: &str) -> AuthResult<String> {
        let now = self.clock.now();
        let token = generate_session_token(phone, now);

        match self.sessions.entry(token.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(Session::new(token.clone(), phone.to_string(), now));
            }
            Entry::Occupied(_) => {
                error!(phone = %mask_phone(phone), "Session token collision");
                return Err(AuthError::internal("session token collision"));
            }
        }

        info!(event = "session_created", phone = %mask_phone(phone), "Session created");
        Ok(token)
    }

    /// Check `token` and refresh its idle deadline.
    ///
    /// Check and refresh happen under the entry's write guard, so a
    /// concurrent `invalidate` is either fully before or fully after.
    pub fn validate(&self, token: &str) -> SessionStatus {
        let now = self.clock.now();
        let idle = self.session_duration();

        match self.sessions.entry(token.to_string()) {
            Entry::Occupied(mut entry) => {
                if entry.get().is_expired(now, idle) {
                    let session = entry.remove();
                    debug!(
                        event = "session_expired",
                        phone = %mask_phone(&session.phone),
                        "Idle session removed on access"
                    );
                    SessionStatus::Unauthenticated
                } else {
                    let session = entry.get_mut();
                    session.touch(now);
                    SessionStatus::Authenticated {
                        phone: session.phone.clone(),
                    }
                }
            }
            Entry::Vacant(_) => SessionStatus::Unauthenticated,
        }
    }

    /// Remove `token`. Returns whether a session existed.
    pub fn invalidate(&self, token: &str) -> bool {
        match self.sessions.remove(token) {
            Some((_, session)) => {
                info!(event = "session_invalidated", phone = %mask_phone(&session.phone), "Session invalidated");
                true
            }
            None => false,
        }
    }

    /// Remove every session belonging to `phone`. Returns how many were removed.
    pub fn invalidate_phone(&self, phone: &str) -> usize {
        let mut removed = 0;
        self.sessions.retain(|_, session| {
            let keep = session.phone != phone;
            if !keep {
                removed += 1;
            }
            keep
        });
        if removed > 0 {
            info!(event = "sessions_revoked", phone = %mask_phone(phone), removed, "Sessions revoked for phone");
        }
        removed
    }

    /// Snapshot of a session without refreshing it
    pub fn get(&self, token: &str) -> Option<Session> {
        self.sessions.get(token).map(|entry| entry.value().clone())
    }

    /// Number of stored sessions, idle ones included until swept
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Drop every idle session. Returns how many were removed.
    pub fn remove_expired(&self) -> usize {
        let now = self.clock.now();
        let idle = self.session_duration();
        let mut removed = 0;
        self.sessions.retain(|_, session| {
            let keep = !session.is_expired(now, idle);
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }
}
