//! Lockout Policy
//!
//! Pure decision logic over account state. Every function takes `now`
//! explicitly and returns a new account value; the store adapter is
//! responsible for applying the equivalent transition atomically.

use chrono::{DateTime, Duration, Utc};

use crate::domain::entity::account::Account;

/// Default failure threshold before lockout
pub const DEFAULT_LOCKOUT_THRESHOLD: u32 = 3;

/// Default lockout duration in minutes
pub const DEFAULT_LOCKOUT_MINUTES: i64 = 30;

/// Failure-threshold lockout policy
///
/// Threshold and duration come from configuration; no call site carries
/// its own magic numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockoutPolicy {
    /// Failures at which the account locks
    pub threshold: u32,
    /// How long a lock lasts
    pub duration: Duration,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_LOCKOUT_THRESHOLD,
            duration: Duration::minutes(DEFAULT_LOCKOUT_MINUTES),
        }
    }
}

impl LockoutPolicy {
    pub fn new(threshold: u32, duration: Duration) -> Self {
        Self {
            threshold,
            duration,
        }
    }

    /// True iff the account has an active lock at `now`.
    ///
    /// Checked before password comparison: a locked account is rejected
    /// without hashing work and without extending the lock.
    pub fn is_locked(&self, account: &Account, now: DateTime<Utc>) -> bool {
        match account.lock_until {
            Some(lock_until) => now < lock_until,
            None => false,
        }
    }

    /// Record a failed login attempt.
    ///
    /// Increments the counter; sets `lock_until = now + duration` when
    /// the new count reaches the threshold.
    pub fn record_failure(&self, account: &Account, now: DateTime<Utc>) -> Account {
        let mut updated = account.clone();
        updated.failed_login_attempts += 1;
        updated.updated_at = now;

        if updated.failed_login_attempts >= self.threshold {
            updated.lock_until = Some(now + self.duration);
        }

        updated
    }

    /// Record a successful login.
    ///
    /// Resets the counter and clears any lock, including an expired one
    /// left over from a previous lockout.
    pub fn record_success(&self, account: &Account, now: DateTime<Utc>) -> Account {
        let mut updated = account.clone();
        updated.failed_login_attempts = 0;
        updated.lock_until = None;
        updated.updated_at = now;
        updated
    }
}
