//! Value Objects
//!
//! Validated primitive wrappers for the identity domain.

pub mod email;
pub mod user_id;
pub mod user_name;
pub mod user_role;

// Re-exports
pub use email::{Email, EmailError};
pub use user_id::UserId;
pub use user_name::{UserName, UserNameError};
pub use user_role::UserRole;
