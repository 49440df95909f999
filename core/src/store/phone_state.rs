//! Concurrent map of phone records.
//!
//! Each phone owns a mutex; every read-modify-write of a phone's challenge,
//! attempt counter or lockout runs while holding it. The map itself is only
//! locked long enough to clone the phone's `Arc`, so different phones never
//! wait on each other.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use tracing::error;
use wl_shared::utils::phone::mask_phone;

use crate::domain::entities::{LockoutRecord, VerificationChallenge};
use crate::errors::{AuthError, AuthResult};

/// Everything the core remembers about one phone
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhoneAuthState {
    /// Pending challenge, if any
    pub challenge: Option<VerificationChallenge>,

    /// Wrong codes since the last success, lockout expiry or idle reset
    pub failed_attempts: u32,

    /// When the most recent wrong code was submitted
    pub last_failure: Option<DateTime<Utc>>,

    /// Active or not yet cleared lockout
    pub lockout: Option<LockoutRecord>,
}

impl PhoneAuthState {
    /// A record carrying no information can be dropped from the map
    pub fn is_empty(&self) -> bool {
        self.challenge.is_none() && self.failed_attempts == 0 && self.lockout.is_none()
    }

    /// Count a wrong code submitted at `now`
    pub fn note_failure(&mut self, now: DateTime<Utc>) {
        self.failed_attempts = self.failed_attempts.saturating_add(1);
        self.last_failure = Some(now);
        if let Some(challenge) = self.challenge.as_mut() {
            challenge.attempt_count = challenge.attempt_count.saturating_add(1);
        }
    }

    /// Forget every counted failure
    pub fn clear_failures(&mut self) {
        self.failed_attempts = 0;
        self.last_failure = None;
    }

    /// Drop a lockout whose window has passed, resetting the counter.
    /// Returns whether one was dropped.
    pub fn expire_lockout(&mut self, now: DateTime<Utc>) -> bool {
        match self.lockout {
            Some(lockout) if !lockout.is_active(now) => {
                self.lockout = None;
                self.clear_failures();
                true
            }
            _ => false,
        }
    }

    /// Forget failures when none was added for a full `window` and no
    /// lockout is pending. Returns whether the counter was reset.
    pub fn expire_stale_failures(&mut self, now: DateTime<Utc>, window: Duration) -> bool {
        let stale = self.lockout.is_none()
            && self.failed_attempts > 0
            && self.last_failure.map_or(false, |at| now - at >= window);
        if stale {
            self.clear_failures();
        }
        stale
    }
}

type PhoneCell = Arc<Mutex<PhoneAuthState>>;

/// Map of phone -> per-phone state cell
#[derive(Debug, Default)]
pub struct PhoneStateStore {
    phones: DashMap<String, PhoneCell>,
}

impl PhoneStateStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` on the phone's record under its lock, creating the record if
    /// the phone was never seen.
    pub fn with_phone<T, F>(&self, phone: &str, f: F) -> AuthResult<T>
    where
        F: FnOnce(&mut PhoneAuthState) -> AuthResult<T>,
    {
        let cell = self.cell_or_default(phone);
        let mut state = lock_cell(phone, &cell)?;
        f(&mut state)
    }

    /// Like [`with_phone`](Self::with_phone) but returns `None` without
    /// allocating a record for an unknown phone.
    pub fn with_existing<T, F>(&self, phone: &str, f: F) -> AuthResult<Option<T>>
    where
        F: FnOnce(&mut PhoneAuthState) -> AuthResult<T>,
    {
        let cell = match self.cell(phone) {
            Some(cell) => cell,
            None => return Ok(None),
        };
        let mut state = lock_cell(phone, &cell)?;
        f(&mut state).map(Some)
    }

    /// Visit every record under its own lock, then drop records that are
    /// empty and not held by an in-flight operation.
    ///
    /// Returns the number of dropped records.
    pub fn sweep<F>(&self, mut visit: F) -> usize
    where
        F: FnMut(&str, &mut PhoneAuthState),
    {
        // Snapshot first so no shard lock is held while waiting on a phone
        let snapshot: Vec<(String, PhoneCell)> = self
            .phones
            .iter()
            .map(|entry| (entry.key().clone(), Arc::clone(entry.value())))
            .collect();

        let mut candidates = Vec::new();
        for (phone, cell) in snapshot {
            let Ok(mut state) = lock_cell(&phone, &cell) else {
                continue;
            };
            visit(&phone, &mut state);
            if state.is_empty() {
                candidates.push(phone);
            }
        }

        let mut dropped = 0;
        for phone in candidates {
            let removed = self.phones.remove_if(&phone, |_, cell| {
                Arc::strong_count(cell) == 1
                    && matches!(cell.try_lock(), Ok(state) if state.is_empty())
            });
            if removed.is_some() {
                dropped += 1;
            }
        }
        dropped
    }

    /// Number of phone records currently held
    pub fn len(&self) -> usize {
        self.phones.len()
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.phones.is_empty()
    }

    /// Whether a record exists for `phone`
    pub fn contains(&self, phone: &str) -> bool {
        self.phones.contains_key(phone)
    }

    fn cell(&self, phone: &str) -> Option<PhoneCell> {
        self.phones.get(phone).map(|entry| Arc::clone(entry.value()))
    }

    fn cell_or_default(&self, phone: &str) -> PhoneCell {
        Arc::clone(self.phones.entry(phone.to_string()).or_default().value())
    }
}

fn lock_cell<'a>(
    phone: &str,
    cell: &'a Mutex<PhoneAuthState>,
) -> AuthResult<MutexGuard<'a, PhoneAuthState>> {
    cell.lock().map_err(|_| {
        error!(phone = %mask_phone(phone), "Phone state lock poisoned");
        AuthError::internal("phone state lock poisoned")
    })
}

