//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.
//!
//! Counter and token-set mutations are store operations (not plain
//! field writes) so adapters can implement them atomically: two
//! concurrent failed logins must both count toward the lockout
//! threshold, and a concurrent success must not race a failure into an
//! inconsistent state. [`crate::domain::lockout::LockoutPolicy`] is the
//! semantic reference every adapter must match.

use chrono::{DateTime, Utc};

use crate::domain::entity::account::Account;
use crate::domain::lockout::LockoutPolicy;
use crate::domain::value_object::{account_id::AccountId, email::Email};
use crate::error::AuthResult;

/// Account repository trait
#[trait_variant::make(AccountRepository: Send)]
pub trait LocalAccountRepository {
    /// Create a new account
    async fn create(&self, account: &Account) -> AuthResult<()>;

    /// Find account by ID
    async fn find_by_id(&self, account_id: &AccountId) -> AuthResult<Option<Account>>;

    /// Find account by (case-normalized) email
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Account>>;

    /// Check if an email is already registered
    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;

    /// Atomically apply a failed-login transition per the policy,
    /// returning the updated account
    async fn record_failure(
        &self,
        account_id: &AccountId,
        policy: &LockoutPolicy,
    ) -> AuthResult<Account>;

    /// Atomically reset failure state after a successful login,
    /// returning the updated account
    async fn record_success(&self, account_id: &AccountId) -> AuthResult<Account>;

    /// Append a refresh token to the account's live set
    async fn push_refresh_token(&self, account_id: &AccountId, token: &str) -> AuthResult<()>;

    /// Remove a refresh token from the live set.
    /// Returns whether it was present; removing an absent token is not an error.
    async fn remove_refresh_token(&self, account_id: &AccountId, token: &str) -> AuthResult<bool>;
}

/// Revoked refresh-token blacklist trait
///
/// Consulted in addition to the account's live set, never instead of it.
#[trait_variant::make(TokenBlacklist: Send)]
pub trait LocalTokenBlacklist {
    /// Record a revoked token. Idempotent.
    async fn insert(&self, token: &str, blacklisted_at: DateTime<Utc>) -> AuthResult<()>;

    /// Whether the token has been revoked
    async fn contains(&self, token: &str) -> AuthResult<bool>;

    /// Drop entries blacklisted before `older_than` (tokens past their
    /// natural expiry). Safe to run at any time.
    async fn purge_expired(&self, older_than: DateTime<Utc>) -> AuthResult<u64>;
}
