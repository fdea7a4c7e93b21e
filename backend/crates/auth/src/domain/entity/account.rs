//! Account Entity
//!
//! A single account record: identity, credentials, lockout state, and
//! the live refresh-token set. One record per user, atomic at the store
//! level. Lockout transitions live in [`crate::domain::lockout`], not
//! here; this entity only carries the state those pure functions read
//! and rewrite.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    account_id::AccountId, email::Email, role::Role, user_password::UserPassword,
};

/// Account entity
#[derive(Debug, Clone)]
pub struct Account {
    /// Opaque identifier
    pub account_id: AccountId,
    /// Unique, case-normalized email
    pub email: Email,
    /// Hashed password (PHC string)
    pub password_hash: UserPassword,
    /// Role (User, Admin)
    pub role: Role,
    /// Consecutive failed login attempts; resets to 0 on success
    pub failed_login_attempts: u32,
    /// Account is locked while `now < lock_until`
    pub lock_until: Option<DateTime<Utc>>,
    /// Live refresh tokens, each independently revocable
    pub refresh_tokens: Vec<String>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account. Role defaults to `User`.
    pub fn new(email: Email, password_hash: UserPassword) -> Self {
        let now = Utc::now();
        Self {
            account_id: AccountId::new(),
            email,
            password_hash,
            role: Role::default(),
            failed_login_attempts: 0,
            lock_until: None,
            refresh_tokens: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the given refresh token is in the live set
    pub fn has_refresh_token(&self, token: &str) -> bool {
        self.refresh_tokens.iter().any(|t| t == token)
    }

    /// Append a refresh token to the live set, returning the updated record
    pub fn with_refresh_token(mut self, token: impl Into<String>) -> Self {
        self.refresh_tokens.push(token.into());
        self.updated_at = Utc::now();
        self
    }

    /// Remove a refresh token from the live set, returning the updated
    /// record and whether it was present. Removing an absent token is
    /// not an error.
    pub fn without_refresh_token(mut self, token: &str) -> (Self, bool) {
        let before = self.refresh_tokens.len();
        self.refresh_tokens.retain(|t| t != token);
        let removed = self.refresh_tokens.len() != before;
        if removed {
            self.updated_at = Utc::now();
        }
        (self, removed)
    }
}
