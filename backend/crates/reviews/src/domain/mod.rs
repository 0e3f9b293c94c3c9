//! Domain Layer
//!
//! Business logic, entities, value objects, policy, repository traits.

pub mod entity;
pub mod policy;
pub mod repository;
pub mod value_object;

pub use entity::{Category, Comment, Genre, Review, Title, TitleDetails};
pub use repository::{
    CategoryRepository, CommentRepository, GenreRepository, ReviewRepository, TitleFilter,
    TitleRepository,
};
