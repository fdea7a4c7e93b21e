//! Login Use Case
//!
//! Authenticates a user and issues an access + refresh token pair.

use std::sync::Arc;

use chrono::Utc;

use crate::application::config::AuthConfig;
use crate::domain::repository::AccountRepository;
use crate::domain::token::TokenCodec;
use crate::domain::value_object::{
    email::Email, role::Role, token_id::TokenId, user_password::RawPassword,
};
use crate::error::{AuthError, AuthResult};

/// Login input
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Role-bearing account summary returned alongside the tokens.
/// Never carries the password hash.
#[derive(Debug)]
pub struct UserSummary {
    pub account_id: String,
    pub email: String,
    pub role: Role,
}

/// Login output
#[derive(Debug)]
pub struct LoginOutput {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserSummary,
}

/// Login use case
pub struct LoginUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
    codec: Arc<TokenCodec>,
    config: Arc<AuthConfig>,
}

impl<R> LoginUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>, codec: Arc<TokenCodec>, config: Arc<AuthConfig>) -> Self {
        Self {
            repo,
            codec,
            config,
        }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        // Shape failures collapse into the same generic error as a wrong
        // password: the response must not reveal which field was off
        let email = Email::new(input.email).map_err(|_| AuthError::InvalidCredentials)?;
        let raw_password =
            RawPassword::for_login(input.password).map_err(|_| AuthError::InvalidCredentials)?;

        // Unknown email reads exactly like a wrong password
        let account = self
            .repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        // Lock check comes before password comparison: no hashing work
        // for a locked account, and the lock is not extended
        let policy = self.config.lockout_policy();
        if policy.is_locked(&account, Utc::now()) {
            return Err(AuthError::AccountLocked);
        }

        let password_valid = account.password_hash.verify(&raw_password, self.config.pepper());

        if !password_valid {
            let updated = self
                .repo
                .record_failure(&account.account_id, &policy)
                .await?;

            if updated.lock_until.is_some() {
                tracing::warn!(
                    account_id = %updated.account_id,
                    failed_attempts = updated.failed_login_attempts,
                    "Account locked after repeated login failures"
                );
            }

            return Err(AuthError::InvalidCredentials);
        }

        // Reset failure state, clear any expired lock
        let account = self.repo.record_success(&account.account_id).await?;

        // Mint the token pair; the refresh token joins the live set
        let token_id = TokenId::new();
        let access_token = self.codec.issue_access(&account.account_id, account.role)?;
        let refresh_token = self.codec.issue_refresh(&account.account_id, &token_id)?;

        self.repo
            .push_refresh_token(&account.account_id, &refresh_token)
            .await?;

        tracing::info!(
            account_id = %account.account_id,
            token_id = %token_id,
            "User logged in"
        );

        Ok(LoginOutput {
            access_token,
            refresh_token,
            user: UserSummary {
                account_id: account.account_id.to_string(),
                email: account.email.as_str().to_string(),
                role: account.role,
            },
        })
    }
}
