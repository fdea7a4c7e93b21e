//! PostgreSQL Repository Implementations
//!
//! Counter and token-set mutations are single UPDATE statements so
//! concurrent logins cannot clobber each other: the increment reads the
//! stored value inside the statement, and the lockout threshold is
//! evaluated against that same value.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::account::Account;
use crate::domain::lockout::LockoutPolicy;
use crate::domain::repository::{AccountRepository, TokenBlacklist};
use crate::domain::value_object::{
    account_id::AccountId, email::Email, role::Role, user_password::UserPassword,
};
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed auth store
#[derive(Clone)]
pub struct PgAuthStore {
    pool: PgPool,
}

impl PgAuthStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Drop blacklist entries old enough that the tokens they refer to
    /// have expired on their own
    pub async fn purge_expired_blacklist(&self, older_than: DateTime<Utc>) -> AuthResult<u64> {
        let deleted = sqlx::query("DELETE FROM revoked_tokens WHERE blacklisted_at < $1")
            .bind(older_than)
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(tokens_deleted = deleted, "Purged expired blacklist entries");

        Ok(deleted)
    }
}

// ============================================================================
// Account Repository Implementation
// ============================================================================

impl AccountRepository for PgAuthStore {
    async fn create(&self, account: &Account) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO accounts (
                account_id,
                email,
                password_hash,
                role,
                failed_login_attempts,
                lock_until,
                refresh_tokens,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(account.account_id.as_uuid())
        .bind(account.email.as_str())
        .bind(account.password_hash.as_phc_string())
        .bind(account.role.id())
        .bind(account.failed_login_attempts as i32)
        .bind(account.lock_until)
        .bind(&account.refresh_tokens)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, account_id: &AccountId) -> AuthResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT
                account_id,
                email,
                password_hash,
                role,
                failed_login_attempts,
                lock_until,
                refresh_tokens,
                created_at,
                updated_at
            FROM accounts
            WHERE account_id = $1
            "#,
        )
        .bind(account_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_account()).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT
                account_id,
                email,
                password_hash,
                role,
                failed_login_attempts,
                lock_until,
                refresh_tokens,
                created_at,
                updated_at
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_account()).transpose()
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM accounts WHERE email = $1)")
                .bind(email.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn record_failure(
        &self,
        account_id: &AccountId,
        policy: &LockoutPolicy,
    ) -> AuthResult<Account> {
        // The increment and the threshold check happen against the
        // stored value inside one statement; concurrent failures all
        // count toward the lock
        let lock_candidate = Utc::now() + policy.duration;

        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            UPDATE accounts SET
                failed_login_attempts = failed_login_attempts + 1,
                lock_until = CASE
                    WHEN failed_login_attempts + 1 >= $2 THEN $3
                    ELSE lock_until
                END,
                updated_at = now()
            WHERE account_id = $1
            RETURNING
                account_id,
                email,
                password_hash,
                role,
                failed_login_attempts,
                lock_until,
                refresh_tokens,
                created_at,
                updated_at
            "#,
        )
        .bind(account_id.as_uuid())
        .bind(policy.threshold as i32)
        .bind(lock_candidate)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or(AuthError::NotFound)?.into_account()
    }

    async fn record_success(&self, account_id: &AccountId) -> AuthResult<Account> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            UPDATE accounts SET
                failed_login_attempts = 0,
                lock_until = NULL,
                updated_at = now()
            WHERE account_id = $1
            RETURNING
                account_id,
                email,
                password_hash,
                role,
                failed_login_attempts,
                lock_until,
                refresh_tokens,
                created_at,
                updated_at
            "#,
        )
        .bind(account_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or(AuthError::NotFound)?.into_account()
    }

    async fn push_refresh_token(&self, account_id: &AccountId, token: &str) -> AuthResult<()> {
        sqlx::query(
            r#"
            UPDATE accounts SET
                refresh_tokens = array_append(refresh_tokens, $2),
                updated_at = now()
            WHERE account_id = $1
            "#,
        )
        .bind(account_id.as_uuid())
        .bind(token)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remove_refresh_token(&self, account_id: &AccountId, token: &str) -> AuthResult<bool> {
        // The guard makes rows_affected meaningful: 0 rows means the
        // token was already gone, which is not an error
        let affected = sqlx::query(
            r#"
            UPDATE accounts SET
                refresh_tokens = array_remove(refresh_tokens, $2),
                updated_at = now()
            WHERE account_id = $1 AND $2 = ANY(refresh_tokens)
            "#,
        )
        .bind(account_id.as_uuid())
        .bind(token)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(affected > 0)
    }
}

// ============================================================================
// Token Blacklist Implementation
// ============================================================================

impl TokenBlacklist for PgAuthStore {
    async fn insert(&self, token: &str, blacklisted_at: DateTime<Utc>) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO revoked_tokens (token, blacklisted_at)
            VALUES ($1, $2)
            ON CONFLICT (token) DO NOTHING
            "#,
        )
        .bind(token)
        .bind(blacklisted_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn contains(&self, token: &str) -> AuthResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM revoked_tokens WHERE token = $1)")
                .bind(token)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn purge_expired(&self, older_than: DateTime<Utc>) -> AuthResult<u64> {
        self.purge_expired_blacklist(older_than).await
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct AccountRow {
    account_id: Uuid,
    email: String,
    password_hash: String,
    role: i16,
    failed_login_attempts: i32,
    lock_until: Option<DateTime<Utc>>,
    refresh_tokens: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AccountRow {
    fn into_account(self) -> AuthResult<Account> {
        let password_hash = UserPassword::from_phc_string(self.password_hash)
            .map_err(|e| AuthError::Internal(format!("Invalid password hash: {}", e)))?;

        Ok(Account {
            account_id: AccountId::from_uuid(self.account_id),
            email: Email::from_db(self.email),
            password_hash,
            role: Role::from_id(self.role),
            failed_login_attempts: self.failed_login_attempts as u32,
            lock_until: self.lock_until,
            refresh_tokens: self.refresh_tokens,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
