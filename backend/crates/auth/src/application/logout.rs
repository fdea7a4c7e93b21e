//! Logout Use Case
//!
//! Revokes a refresh token: removes it from the owning account's live
//! set and records it on the blacklist. Idempotent end to end; logging
//! out twice with the same token succeeds both times.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::repository::{AccountRepository, TokenBlacklist};
use crate::domain::token::TokenCodec;
use crate::error::{AuthError, AuthResult};

/// Logout use case
pub struct LogoutUseCase<R>
where
    R: AccountRepository + TokenBlacklist,
{
    repo: Arc<R>,
    codec: Arc<TokenCodec>,
}

impl<R> LogoutUseCase<R>
where
    R: AccountRepository + TokenBlacklist,
{
    pub fn new(repo: Arc<R>, codec: Arc<TokenCodec>) -> Self {
        Self { repo, codec }
    }

    pub async fn execute(&self, refresh_token: &str) -> AuthResult<()> {
        let claims = self
            .codec
            .verify_refresh(refresh_token)
            .ok_or(AuthError::Unauthorized)?;

        // Removing an already-removed token is not an error
        let removed = self
            .repo
            .remove_refresh_token(&claims.account_id(), refresh_token)
            .await?;

        // Blacklist insert is idempotent as well; the token stays listed
        // at least until its natural expiry
        self.repo.insert(refresh_token, Utc::now()).await?;

        tracing::info!(
            account_id = %claims.account_id(),
            token = %platform::crypto::token_digest(refresh_token),
            was_live = removed,
            "Refresh token revoked"
        );

        Ok(())
    }
}
