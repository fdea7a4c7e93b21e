//! Application Configuration
//!
//! Configuration for the Auth application layer. Built once at process
//! start and passed into constructors; business logic never reads the
//! environment on its own.

use std::time::Duration;

use crate::domain::lockout::{DEFAULT_LOCKOUT_MINUTES, DEFAULT_LOCKOUT_THRESHOLD, LockoutPolicy};
use crate::domain::token::TokenCodec;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Access-token signing secret (32 bytes)
    pub access_secret: [u8; 32],
    /// Refresh-token signing secret (32 bytes, independent of access)
    pub refresh_secret: [u8; 32],
    /// Access-token TTL (15 minutes)
    pub access_ttl: Duration,
    /// Refresh-token TTL (1 week); must exceed `access_ttl`
    pub refresh_ttl: Duration,
    /// Failed logins before temporary lockout
    pub lockout_threshold: u32,
    /// Lockout duration (30 minutes)
    pub lockout_duration: Duration,
    /// Rotate the refresh token on every refresh call.
    /// Off by default: the same refresh token stays valid until its own
    /// expiry or explicit logout.
    pub rotate_refresh_on_use: bool,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_secret: [0u8; 32],
            refresh_secret: [0u8; 32],
            access_ttl: Duration::from_secs(15 * 60), // 15 minutes
            refresh_ttl: Duration::from_secs(7 * 24 * 3600), // 1 week
            lockout_threshold: DEFAULT_LOCKOUT_THRESHOLD,
            lockout_duration: Duration::from_secs(DEFAULT_LOCKOUT_MINUTES as u64 * 60),
            rotate_refresh_on_use: false,
            password_pepper: None,
        }
    }
}

impl AuthConfig {
    /// Create config with random signing secrets (for development)
    pub fn with_random_secrets() -> Self {
        let mut access_secret = [0u8; 32];
        access_secret.copy_from_slice(&platform::crypto::random_bytes(32));
        let mut refresh_secret = [0u8; 32];
        refresh_secret.copy_from_slice(&platform::crypto::random_bytes(32));

        Self {
            access_secret,
            refresh_secret,
            ..Default::default()
        }
    }

    /// Create config for development
    pub fn development() -> Self {
        Self::with_random_secrets()
    }

    /// Build the token codec from this config
    pub fn token_codec(&self) -> TokenCodec {
        TokenCodec::new(
            &self.access_secret,
            &self.refresh_secret,
            self.access_ttl,
            self.refresh_ttl,
        )
    }

    /// Build the lockout policy from this config
    pub fn lockout_policy(&self) -> LockoutPolicy {
        LockoutPolicy::new(
            self.lockout_threshold,
            chrono::Duration::seconds(self.lockout_duration.as_secs() as i64),
        )
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}
