//! Domain Layer
//!
//! Contains entities, value objects, domain services, and repository traits.

pub mod confirmation;
pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use confirmation::ConfirmationCodes;
pub use entity::User;
pub use repository::UserRepository;
