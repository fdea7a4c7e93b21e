//! Register Use Case
//!
//! Creates a new account. Never auto-logs-in: the caller must go
//! through the login path to obtain tokens.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::account::Account;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{
    email::Email,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

/// Register input
pub struct RegisterInput {
    pub email: String,
    pub password: String,
}

/// Register output
pub struct RegisterOutput {
    pub account_id: String,
}

/// Register use case
pub struct RegisterUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> RegisterUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<RegisterOutput> {
        // Validate email shape
        let email = Email::new(input.email)
            .map_err(|e| AuthError::Validation(vec![e.message().to_string()]))?;

        // Duplicate email is reported before any hashing work
        if self.repo.exists_by_email(&email).await? {
            return Err(AuthError::AlreadyExists);
        }

        // Validate and hash password; every failed policy rule is reported
        let raw_password = RawPassword::new(input.password)?;
        let password_hash = UserPassword::from_raw(&raw_password, self.config.pepper())?;

        // Role defaults to `User`
        let account = Account::new(email, password_hash);

        self.repo.create(&account).await?;

        tracing::info!(
            account_id = %account.account_id,
            "Account registered"
        );

        Ok(RegisterOutput {
            account_id: account.account_id.to_string(),
        })
    }
}
