//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and middleware.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::AuthAppState;
pub use middleware::{
    AuthGateState, Identity, RoleGateState, authenticate, authorize, require_auth, require_role,
};
pub use router::{auth_router, auth_router_generic};
