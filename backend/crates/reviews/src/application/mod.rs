//! Application Layer
//!
//! Use cases and application services.

pub mod catalog;
pub mod comments;
pub mod reviews;
pub mod titles;

// Re-exports
pub use catalog::{CategoryService, CreateNamedSlugInput, GenreService};
pub use comments::{CommentInput, CommentService};
pub use reviews::{CreateReviewInput, ReviewPatch, ReviewService};
pub use titles::{CreateTitleInput, TitlePatch, TitleService};
