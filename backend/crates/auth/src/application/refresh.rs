//! Refresh Use Case
//!
//! Exchanges a live refresh token for a new access token. A refresh
//! token is honored only when all of these hold:
//! 1. signature and expiry verify under the refresh secret,
//! 2. it is not on the revocation blacklist,
//! 3. it is present in the owning account's live token set.
//!
//! A structurally valid token that was never issued to the account, or
//! was revoked by logout, fails exactly like a forged one.

use std::sync::Arc;

use chrono::Utc;

use crate::application::config::AuthConfig;
use crate::domain::repository::{AccountRepository, TokenBlacklist};
use crate::domain::token::TokenCodec;
use crate::domain::value_object::token_id::TokenId;
use crate::error::{AuthError, AuthResult};

/// Refresh output
#[derive(Debug)]
pub struct RefreshOutput {
    pub access_token: String,
    /// Present only when rotate-on-use is enabled
    pub refresh_token: Option<String>,
}

/// Refresh use case
pub struct RefreshUseCase<R>
where
    R: AccountRepository + TokenBlacklist,
{
    repo: Arc<R>,
    codec: Arc<TokenCodec>,
    config: Arc<AuthConfig>,
}

impl<R> RefreshUseCase<R>
where
    R: AccountRepository + TokenBlacklist,
{
    pub fn new(repo: Arc<R>, codec: Arc<TokenCodec>, config: Arc<AuthConfig>) -> Self {
        Self {
            repo,
            codec,
            config,
        }
    }

    pub async fn execute(&self, refresh_token: &str) -> AuthResult<RefreshOutput> {
        let claims = self
            .codec
            .verify_refresh(refresh_token)
            .ok_or(AuthError::Unauthorized)?;

        // Blacklist check is in addition to the live-set check below,
        // not instead of it
        if self.repo.contains(refresh_token).await? {
            tracing::warn!(
                token = %platform::crypto::token_digest(refresh_token),
                "Blacklisted refresh token presented"
            );
            return Err(AuthError::Unauthorized);
        }

        let account = self
            .repo
            .find_by_id(&claims.account_id())
            .await?
            .ok_or(AuthError::Unauthorized)?;

        if !account.has_refresh_token(refresh_token) {
            tracing::warn!(
                account_id = %account.account_id,
                token = %platform::crypto::token_digest(refresh_token),
                "Refresh token not in live set"
            );
            return Err(AuthError::Unauthorized);
        }

        let access_token = self.codec.issue_access(&account.account_id, account.role)?;

        // Default policy: the refresh token itself is not rotated and
        // stays valid until its own expiry or explicit logout
        let rotated = if self.config.rotate_refresh_on_use {
            let token_id = TokenId::new();
            let new_refresh = self.codec.issue_refresh(&account.account_id, &token_id)?;

            self.repo
                .remove_refresh_token(&account.account_id, refresh_token)
                .await?;
            self.repo.insert(refresh_token, Utc::now()).await?;
            self.repo
                .push_refresh_token(&account.account_id, &new_refresh)
                .await?;

            Some(new_refresh)
        } else {
            None
        };

        tracing::debug!(
            account_id = %account.account_id,
            rotated = rotated.is_some(),
            "Access token refreshed"
        );

        Ok(RefreshOutput {
            access_token,
            refresh_token: rotated,
        })
    }
}
