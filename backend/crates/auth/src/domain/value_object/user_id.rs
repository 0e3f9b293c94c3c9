//! User ID Value Object
//!
//! Type alias over the kernel's typed ID wrapper.

pub use kernel::id::markers;
use kernel::id::Id;

/// Internal user identifier (UUID v4)
pub type UserId = Id<markers::User>;
