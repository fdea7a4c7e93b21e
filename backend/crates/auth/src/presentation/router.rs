//! Auth Router

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::{AccountRepository, TokenBlacklist};
use crate::infra::postgres::PgAuthStore;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{AuthGateState, require_auth};

/// Create the Auth router with the PostgreSQL store
pub fn auth_router(store: PgAuthStore, config: AuthConfig) -> Router {
    auth_router_generic(store, config)
}

/// Create a generic Auth router for any store implementation
pub fn auth_router_generic<R>(repo: R, config: AuthConfig) -> Router
where
    R: AccountRepository + TokenBlacklist + Clone + Send + Sync + 'static,
{
    let codec = Arc::new(config.token_codec());

    let state = AuthAppState {
        repo: Arc::new(repo),
        config: Arc::new(config),
        codec: codec.clone(),
    };

    let gate = AuthGateState { codec };

    let protected = Router::new()
        .route("/me", get(handlers::me::<R>))
        .layer(axum_middleware::from_fn(move |req, next| {
            require_auth(gate.clone(), req, next)
        }));

    Router::new()
        .route("/register", post(handlers::register::<R>))
        .route("/login", post(handlers::login::<R>))
        .route("/refresh", post(handlers::refresh::<R>))
        .route("/logout", post(handlers::logout::<R>))
        .merge(protected)
        .with_state(state)
}
