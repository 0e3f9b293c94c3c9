//! Reviews (Catalog & Contributions) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, policy, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Categories and genres (admin-managed reference data, unique slugs)
//! - Titles with release-year validation and computed ratings
//! - Reviews (one per author per title, score 1-10)
//! - Comments on reviews
//! - Ownership/moderation policy for contribution edits

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use error::{ReviewsError, ReviewsResult};
pub use infra::postgres::PgCatalogRepository;
pub use presentation::router::catalog_router;

// Convenience re-exports
pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod router {
    pub use crate::presentation::router::*;
}
