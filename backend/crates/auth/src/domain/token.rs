//! Token Codec
//!
//! Mints and verifies the two signed credentials this core issues:
//! short-lived access tokens and longer-lived refresh tokens. Compact
//! JWT serialization (header.payload.signature, base64url), HS256 with
//! a separate secret per token class to bound the blast radius of a
//! key compromise.
//!
//! Verification is deliberately a single opaque result: malformed,
//! tampered, expired, and wrong-key tokens are all just `None`, so the
//! caller can never leak which check failed.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::Duration as StdDuration;
use uuid::Uuid;

use crate::domain::value_object::{account_id::AccountId, role::Role, token_id::TokenId};
use crate::error::{AuthError, AuthResult};

/// Claims carried by an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Account id
    pub sub: Uuid,
    /// Role at issue time
    pub role: Role,
    /// Issued at (Unix seconds)
    pub iat: i64,
    /// Expires at (Unix seconds)
    pub exp: i64,
}

impl AccessClaims {
    pub fn account_id(&self) -> AccountId {
        AccountId::from_uuid(self.sub)
    }
}

/// Claims carried by a refresh token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// Account id
    pub sub: Uuid,
    /// Token id, unique per issued refresh token
    pub jti: Uuid,
    /// Issued at (Unix seconds)
    pub iat: i64,
    /// Expires at (Unix seconds)
    pub exp: i64,
}

impl RefreshClaims {
    pub fn account_id(&self) -> AccountId {
        AccountId::from_uuid(self.sub)
    }
}

/// Stateless encoder/decoder for access and refresh tokens
///
/// Built once at process start from configuration; holds the only
/// copies of the signing keys the business logic ever sees.
pub struct TokenCodec {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
    validation: Validation,
}

impl TokenCodec {
    /// Create a codec from the two signing secrets and TTLs.
    ///
    /// The refresh TTL must be strictly greater than the access TTL so
    /// a refresh token always outlives the access tokens it mints.
    pub fn new(
        access_secret: &[u8],
        refresh_secret: &[u8],
        access_ttl: StdDuration,
        refresh_ttl: StdDuration,
    ) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0; // No clock skew tolerance

        Self {
            access_encoding: EncodingKey::from_secret(access_secret),
            access_decoding: DecodingKey::from_secret(access_secret),
            refresh_encoding: EncodingKey::from_secret(refresh_secret),
            refresh_decoding: DecodingKey::from_secret(refresh_secret),
            access_ttl: Duration::seconds(access_ttl.as_secs() as i64),
            refresh_ttl: Duration::seconds(refresh_ttl.as_secs() as i64),
            validation,
        }
    }

    /// Access-token TTL
    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    /// Refresh-token TTL
    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    /// Issue a signed access token for the account
    pub fn issue_access(&self, account_id: &AccountId, role: Role) -> AuthResult<String> {
        self.issue_access_at(account_id, role, Utc::now())
    }

    pub(crate) fn issue_access_at(
        &self,
        account_id: &AccountId,
        role: Role,
        now: DateTime<Utc>,
    ) -> AuthResult<String> {
        let claims = AccessClaims {
            sub: *account_id.as_uuid(),
            role,
            iat: now.timestamp(),
            exp: (now + self.access_ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.access_encoding)
            .map_err(|e| AuthError::Internal(format!("Access token signing failed: {}", e)))
    }

    /// Issue a signed refresh token for the account
    pub fn issue_refresh(&self, account_id: &AccountId, token_id: &TokenId) -> AuthResult<String> {
        self.issue_refresh_at(account_id, token_id, Utc::now())
    }

    pub(crate) fn issue_refresh_at(
        &self,
        account_id: &AccountId,
        token_id: &TokenId,
        now: DateTime<Utc>,
    ) -> AuthResult<String> {
        let claims = RefreshClaims {
            sub: *account_id.as_uuid(),
            jti: *token_id.as_uuid(),
            iat: now.timestamp(),
            exp: (now + self.refresh_ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.refresh_encoding)
            .map_err(|e| AuthError::Internal(format!("Refresh token signing failed: {}", e)))
    }

    /// Decode an access token.
    ///
    /// `None` for anything that is not a currently valid token signed
    /// with the access secret. Never panics.
    pub fn verify_access(&self, token: &str) -> Option<AccessClaims> {
        decode::<AccessClaims>(token, &self.access_decoding, &self.validation)
            .ok()
            .map(|data| data.claims)
    }

    /// Decode a refresh token. Same opaque contract as [`Self::verify_access`].
    pub fn verify_refresh(&self, token: &str) -> Option<RefreshClaims> {
        decode::<RefreshClaims>(token, &self.refresh_decoding, &self.validation)
            .ok()
            .map(|data| data.claims)
    }
}
