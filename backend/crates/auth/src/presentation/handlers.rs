//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Extension;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    LoginInput, LoginUseCase, LogoutUseCase, RefreshUseCase, RegisterInput, RegisterUseCase,
};
use crate::domain::repository::{AccountRepository, TokenBlacklist};
use crate::domain::token::TokenCodec;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    LoginRequest, LoginResponse, LogoutRequest, MeResponse, RefreshRequest, RefreshResponse,
    RegisterRequest, RegisterResponse, UserSummaryDto,
};
use crate::presentation::middleware::Identity;

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: AccountRepository + TokenBlacklist + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
    pub codec: Arc<TokenCodec>,
}

// ============================================================================
// Register
// ============================================================================

/// POST /api/auth/register
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<RegisterRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: AccountRepository + TokenBlacklist + Clone + Send + Sync + 'static,
{
    let use_case = RegisterUseCase::new(state.repo.clone(), state.config.clone());

    let input = RegisterInput {
        email: req.email,
        password: req.password,
    };

    let output = use_case.execute(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            id: output.account_id,
        }),
    ))
}

// ============================================================================
// Login
// ============================================================================

/// POST /api/auth/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<Json<LoginResponse>>
where
    R: AccountRepository + TokenBlacklist + Clone + Send + Sync + 'static,
{
    let use_case = LoginUseCase::new(
        state.repo.clone(),
        state.codec.clone(),
        state.config.clone(),
    );

    let input = LoginInput {
        email: req.email,
        password: req.password,
    };

    let output = use_case.execute(input).await?;

    Ok(Json(LoginResponse {
        access_token: output.access_token,
        refresh_token: output.refresh_token,
        user: UserSummaryDto {
            id: output.user.account_id,
            email: output.user.email,
            role: output.user.role.code().to_string(),
        },
    }))
}

// ============================================================================
// Refresh
// ============================================================================

/// POST /api/auth/refresh
pub async fn refresh<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<RefreshRequest>,
) -> AuthResult<Json<RefreshResponse>>
where
    R: AccountRepository + TokenBlacklist + Clone + Send + Sync + 'static,
{
    let use_case = RefreshUseCase::new(
        state.repo.clone(),
        state.codec.clone(),
        state.config.clone(),
    );

    let output = use_case.execute(&req.refresh_token).await?;

    Ok(Json(RefreshResponse {
        access_token: output.access_token,
        refresh_token: output.refresh_token,
    }))
}

// ============================================================================
// Logout
// ============================================================================

/// POST /api/auth/logout
pub async fn logout<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<LogoutRequest>,
) -> AuthResult<StatusCode>
where
    R: AccountRepository + TokenBlacklist + Clone + Send + Sync + 'static,
{
    let use_case = LogoutUseCase::new(state.repo.clone(), state.codec.clone());

    use_case.execute(&req.refresh_token).await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Current User (requires authentication middleware)
// ============================================================================

/// GET /api/auth/me
pub async fn me<R>(
    State(state): State<AuthAppState<R>>,
    Extension(identity): Extension<Identity>,
) -> AuthResult<Json<MeResponse>>
where
    R: AccountRepository + TokenBlacklist + Clone + Send + Sync + 'static,
{
    let account = state
        .repo
        .find_by_id(&identity.account_id)
        .await?
        .ok_or(AuthError::NotFound)?;

    Ok(Json(MeResponse {
        id: account.account_id.to_string(),
        email: account.email.as_str().to_string(),
        role: account.role.code().to_string(),
    }))
}
