//! Domain Layer
//!
//! Contains entities, value objects, pure policies, and repository traits.

pub mod entity;
pub mod lockout;
pub mod repository;
pub mod token;
pub mod value_object;

// Re-exports
pub use entity::account::Account;
pub use lockout::LockoutPolicy;
pub use repository::{AccountRepository, TokenBlacklist};
pub use token::{AccessClaims, RefreshClaims, TokenCodec};
