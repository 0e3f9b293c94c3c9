//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and middleware.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::AuthAppState;
pub use middleware::{CurrentUser, authenticate, authenticate_pg};
pub use router::{
    PgAuthAppState, auth_router, auth_router_generic, pg_state, users_router,
    users_router_generic,
};
