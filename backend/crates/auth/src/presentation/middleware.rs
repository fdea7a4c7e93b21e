//! Auth Middleware
//!
//! The authorization gate for protected routes: Bearer-token
//! authentication and role-set authorization. The decision functions
//! are plain functions over headers and claims; the axum wrappers only
//! adapt them to the middleware signature.

use axum::body::Body;
use axum::http::{HeaderMap, Request, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use crate::domain::token::TokenCodec;
use crate::domain::value_object::{account_id::AccountId, role::Role};
use crate::error::{AuthError, AuthResult};

/// Authenticated identity extracted from a verified access token.
/// Inserted into request extensions for downstream handlers.
#[derive(Debug, Clone, Copy)]
pub struct Identity {
    pub account_id: AccountId,
    pub role: Role,
}

/// Extract the token from a `Bearer <token>` Authorization header.
///
/// Missing header, non-Bearer scheme, and empty token all come back as
/// `None`; the caller maps every shape of absence to `Unauthorized`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() { None } else { Some(token) }
}

/// Authenticate a request from its headers.
///
/// Missing header, malformed scheme, and a token that fails
/// verification are all the same `Unauthorized`; no further processing
/// happens on any of them.
pub fn authenticate(headers: &HeaderMap, codec: &TokenCodec) -> AuthResult<Identity> {
    let token = bearer_token(headers).ok_or(AuthError::Unauthorized)?;
    let claims = codec.verify_access(token).ok_or(AuthError::Unauthorized)?;

    Ok(Identity {
        account_id: claims.account_id(),
        role: claims.role,
    })
}

/// Authorize an identity against an allowed-role set.
///
/// No identity at all is `Unauthorized` (authentication was skipped or
/// failed upstream); a present identity outside the set is `Forbidden`.
/// Pure set membership, no hierarchy.
pub fn authorize(identity: Option<&Identity>, allowed_roles: &[Role]) -> AuthResult<()> {
    let identity = identity.ok_or(AuthError::Unauthorized)?;

    if allowed_roles.contains(&identity.role) {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}

/// Middleware state for authentication
#[derive(Clone)]
pub struct AuthGateState {
    pub codec: Arc<TokenCodec>,
}

/// Middleware state for role-gated routes
#[derive(Clone)]
pub struct RoleGateState {
    pub codec: Arc<TokenCodec>,
    pub allowed_roles: Arc<[Role]>,
}

/// Middleware that requires a valid access token.
///
/// On success the [`Identity`] is stored in request extensions.
pub async fn require_auth(
    state: AuthGateState,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let identity = match authenticate(req.headers(), &state.codec) {
        Ok(identity) => identity,
        Err(e) => return Err(e.into_response()),
    };

    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}

/// Middleware that requires a valid access token with one of the
/// allowed roles.
pub async fn require_role(
    state: RoleGateState,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let identity = authenticate(req.headers(), &state.codec).ok();

    if let Err(e) = authorize(identity.as_ref(), &state.allowed_roles) {
        return Err(e.into_response());
    }

    // authorize() only admits when an identity is present
    if let Some(identity) = identity {
        req.extensions_mut().insert(identity);
    }

    Ok(next.run(req).await)
}
