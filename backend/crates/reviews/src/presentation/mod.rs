//! Presentation Layer
//!
//! HTTP handlers, DTOs, router.

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::{CatalogStore, ReviewsAppState};
pub use router::{catalog_router, catalog_router_generic};
