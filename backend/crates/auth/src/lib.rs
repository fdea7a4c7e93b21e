//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, pure policies, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! ## Features
//! - Account registration and login with email + password
//! - Short-lived access tokens, rotatable refresh tokens (JWT, HS256)
//! - Refresh-token revocation via live set + blacklist
//! - Role-based route authorization (set membership, no hierarchy)
//! - Input validation and free-text sanitization upstream of writes
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, policy violations reported in full
//! - Separate signing secrets for access and refresh tokens
//! - Automatic lockout after repeated failed login attempts
//! - No oracle leakage: unknown email and wrong password are identical,
//!   and token verification failures are a single opaque result

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use domain::token::TokenCodec;
pub use error::{AuthError, AuthResult};
pub use infra::memory::InMemoryAuthStore;
pub use infra::postgres::PgAuthStore;
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod store {
    pub use crate::infra::memory::InMemoryAuthStore;
    pub use crate::infra::postgres::PgAuthStore as AuthStore;
}

pub mod router {
    pub use crate::presentation::router::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
