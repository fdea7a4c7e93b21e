//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use auth::{AuthConfig, PgAuthStore, auth_router};
use axum::{
    Router, http,
    http::{Method, header},
};
use base64::Engine;
use base64::engine::general_purpose;
use chrono::Utc;
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Auth configuration: secrets from environment in production,
    // random per-process secrets in debug builds
    let auth_config = build_auth_config()?;

    // Startup cleanup: drop blacklist entries whose tokens have expired
    // on their own. Errors here should not prevent server startup.
    let store_for_cleanup = PgAuthStore::new(pool.clone());
    let cutoff = Utc::now()
        - chrono::Duration::seconds(auth_config.refresh_ttl.as_secs() as i64);
    match store_for_cleanup.purge_expired_blacklist(cutoff).await {
        Ok(deleted) => {
            tracing::info!(tokens_deleted = deleted, "Blacklist cleanup completed");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Blacklist cleanup failed, continuing anyway");
        }
    }

    let auth_store = PgAuthStore::new(pool.clone());

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router
    let app = Router::new()
        .nest("/api/auth", auth_router(auth_store, auth_config))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], 8080));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Assemble the auth configuration from the environment.
///
/// All business-logic constants enter through this one struct; nothing
/// downstream reads the environment.
fn build_auth_config() -> anyhow::Result<AuthConfig> {
    if cfg!(debug_assertions) {
        return Ok(AuthConfig::development());
    }

    // In production, both secrets must come from the environment
    let access_secret = decode_secret_env("ACCESS_TOKEN_SECRET")?;
    let refresh_secret = decode_secret_env("REFRESH_TOKEN_SECRET")?;

    let mut config = AuthConfig {
        access_secret,
        refresh_secret,
        ..AuthConfig::default()
    };

    if let Ok(secs) = env::var("ACCESS_TOKEN_TTL_SECS") {
        config.access_ttl = Duration::from_secs(secs.parse()?);
    }
    if let Ok(secs) = env::var("REFRESH_TOKEN_TTL_SECS") {
        config.refresh_ttl = Duration::from_secs(secs.parse()?);
    }
    if let Ok(threshold) = env::var("LOCKOUT_THRESHOLD") {
        config.lockout_threshold = threshold.parse()?;
    }
    if let Ok(minutes) = env::var("LOCKOUT_DURATION_MINUTES") {
        config.lockout_duration = Duration::from_secs(minutes.parse::<u64>()? * 60);
    }

    anyhow::ensure!(
        config.refresh_ttl > config.access_ttl,
        "REFRESH_TOKEN_TTL_SECS must exceed ACCESS_TOKEN_TTL_SECS"
    );

    Ok(config)
}

/// Decode a base64-encoded 32-byte secret from the environment
fn decode_secret_env(name: &str) -> anyhow::Result<[u8; 32]> {
    let secret_b64 =
        env::var(name).map_err(|_| anyhow::anyhow!("{} must be set in production", name))?;
    let secret_bytes = Engine::decode(&general_purpose::STANDARD, &secret_b64)?;

    anyhow::ensure!(
        secret_bytes.len() == 32,
        "{} must decode to exactly 32 bytes",
        name
    );

    let mut secret = [0u8; 32];
    secret.copy_from_slice(&secret_bytes);
    Ok(secret)
}
