//! In-Memory Repository Implementation
//!
//! HashMap-backed store for tests and local development. Mutations go
//! through the same pure lockout policy the Postgres adapter mirrors in
//! SQL, so both implementations agree on the transitions.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entity::account::Account;
use crate::domain::lockout::LockoutPolicy;
use crate::domain::repository::{AccountRepository, TokenBlacklist};
use crate::domain::value_object::{account_id::AccountId, email::Email};
use crate::error::{AuthError, AuthResult};

#[derive(Default)]
struct State {
    accounts: HashMap<Uuid, Account>,
    emails: HashMap<String, Uuid>,
    blacklist: HashMap<String, DateTime<Utc>>,
}

/// In-memory auth store
#[derive(Clone, Default)]
pub struct InMemoryAuthStore {
    inner: Arc<Mutex<State>>,
}

impl InMemoryAuthStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut State) -> T) -> T {
        let mut state = self.inner.lock().expect("store mutex poisoned");
        f(&mut state)
    }
}

impl AccountRepository for InMemoryAuthStore {
    async fn create(&self, account: &Account) -> AuthResult<()> {
        self.with_state(|state| {
            let email = account.email.as_str().to_string();
            if state.emails.contains_key(&email) {
                return Err(AuthError::AlreadyExists);
            }
            let id = *account.account_id.as_uuid();
            state.emails.insert(email, id);
            state.accounts.insert(id, account.clone());
            Ok(())
        })
    }

    async fn find_by_id(&self, account_id: &AccountId) -> AuthResult<Option<Account>> {
        Ok(self.with_state(|state| state.accounts.get(account_id.as_uuid()).cloned()))
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Account>> {
        Ok(self.with_state(|state| {
            state
                .emails
                .get(email.as_str())
                .and_then(|id| state.accounts.get(id))
                .cloned()
        }))
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        Ok(self.with_state(|state| state.emails.contains_key(email.as_str())))
    }

    async fn record_failure(
        &self,
        account_id: &AccountId,
        policy: &LockoutPolicy,
    ) -> AuthResult<Account> {
        let policy = *policy;
        self.with_state(|state| {
            let account = state
                .accounts
                .get(account_id.as_uuid())
                .ok_or(AuthError::NotFound)?;
            let updated = policy.record_failure(account, Utc::now());
            state
                .accounts
                .insert(*account_id.as_uuid(), updated.clone());
            Ok(updated)
        })
    }

    async fn record_success(&self, account_id: &AccountId) -> AuthResult<Account> {
        self.with_state(|state| {
            let account = state
                .accounts
                .get(account_id.as_uuid())
                .ok_or(AuthError::NotFound)?;
            let updated = LockoutPolicy::default().record_success(account, Utc::now());
            state
                .accounts
                .insert(*account_id.as_uuid(), updated.clone());
            Ok(updated)
        })
    }

    async fn push_refresh_token(&self, account_id: &AccountId, token: &str) -> AuthResult<()> {
        self.with_state(|state| {
            let account = state
                .accounts
                .get(account_id.as_uuid())
                .ok_or(AuthError::NotFound)?
                .clone();
            let updated = account.with_refresh_token(token);
            state.accounts.insert(*account_id.as_uuid(), updated);
            Ok(())
        })
    }

    async fn remove_refresh_token(&self, account_id: &AccountId, token: &str) -> AuthResult<bool> {
        self.with_state(|state| {
            let account = state
                .accounts
                .get(account_id.as_uuid())
                .ok_or(AuthError::NotFound)?
                .clone();
            let (updated, removed) = account.without_refresh_token(token);
            state.accounts.insert(*account_id.as_uuid(), updated);
            Ok(removed)
        })
    }
}

impl TokenBlacklist for InMemoryAuthStore {
    async fn insert(&self, token: &str, blacklisted_at: DateTime<Utc>) -> AuthResult<()> {
        self.with_state(|state| {
            state
                .blacklist
                .entry(token.to_string())
                .or_insert(blacklisted_at);
        });
        Ok(())
    }

    async fn contains(&self, token: &str) -> AuthResult<bool> {
        Ok(self.with_state(|state| state.blacklist.contains_key(token)))
    }

    async fn purge_expired(&self, older_than: DateTime<Utc>) -> AuthResult<u64> {
        Ok(self.with_state(|state| {
            let before = state.blacklist.len();
            state.blacklist.retain(|_, at| *at >= older_than);
            (before - state.blacklist.len()) as u64
        }))
    }
}
