//! Periodic removal of expired authentication state.
//!
//! Purely advisory: every read path re-checks expiry itself, so the sweep
//! only bounds memory.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};
use wl_shared::config::{CleanupConfig, OtpConfig};

use crate::clock::Clock;
use crate::services::session::SessionStore;
use crate::store::PhoneStateStore;

/// Sweeps expired codes, idle sessions and elapsed lockouts
pub struct AuthCleanupService {
    store: Arc<PhoneStateStore>,
    sessions: Arc<SessionStore>,
    clock: Arc<dyn Clock>,
    otp: OtpConfig,
    config: CleanupConfig,
}

impl AuthCleanupService {
    pub fn new(
        store: Arc<PhoneStateStore>,
        sessions: Arc<SessionStore>,
        clock: Arc<dyn Clock>,
        otp: OtpConfig,
        config: CleanupConfig,
    ) -> Self {
        Self {
            store,
            sessions,
            clock,
            otp,
            config,
        }
    }

    /// Run a single cleanup cycle
    pub fn run_cleanup(&self) -> CleanupResult {
        let now = self.clock.now();
        let code_ttl = self.otp.code_ttl();
        let failure_window = self.otp.lockout_duration();
        let mut result = CleanupResult::default();

        let dropped = self.store.sweep(|_, state| {
            if state
                .challenge
                .as_ref()
                .map_or(false, |challenge| challenge.is_expired(now, code_ttl))
            {
                state.challenge = None;
                result.expired_codes += 1;
            }

            if state.expire_lockout(now) {
                result.expired_lockouts += 1;
            }

            if state.expire_stale_failures(now, failure_window) {
                result.expired_counters += 1;
            }
        });
        result.dropped_records = dropped;

        result.expired_sessions = self.sessions.remove_expired();

        if result.total_cleaned() > 0 {
            info!(
                expired_codes = result.expired_codes,
                expired_sessions = result.expired_sessions,
                expired_lockouts = result.expired_lockouts,
                expired_counters = result.expired_counters,
                dropped_records = result.dropped_records,
                "Auth cleanup completed"
            );
        } else {
            debug!("Auth cleanup found nothing to remove");
        }

        result
    }

    /// Start the cleanup service as a background task
    ///
    /// Returns `None` when cleanup is disabled.
    pub fn start_background_task(self: Arc<Self>) -> Option<JoinHandle<()>> {
        if !self.config.enabled {
            warn!("Auth cleanup service is disabled");
            return None;
        }

        let period = std::time::Duration::from_secs(self.config.interval_seconds.max(1));

        Some(tokio::spawn(async move {
            info!(
                "Auth cleanup service started - will run every {} seconds",
                period.as_secs()
            );

            let mut interval_timer = tokio::time::interval(period);
            interval_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval_timer.tick().await;
                self.run_cleanup();
            }
        }))
    }
}

/// Result of a cleanup operation
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CleanupResult {
    /// Challenges removed after their TTL
    pub expired_codes: usize,
    /// Sessions removed after the idle timeout
    pub expired_sessions: usize,
    /// Lockouts whose window had passed
    pub expired_lockouts: usize,
    /// Failure counters idle for a full lockout window
    pub expired_counters: usize,
    /// Phone records that carried no state anymore
    pub dropped_records: usize,
}

impl CleanupResult {
    /// Get total number of items cleaned up
    pub fn total_cleaned(&self) -> usize {
        self.expired_codes
            + self.expired_sessions
            + self.expired_lockouts
            + self.expired_counters
            + self.dropped_records
    }
}
