//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use crate::domain::entity::User;
use crate::domain::value_object::{Email, UserId, UserName};
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create a new user.
    ///
    /// Unique-constraint violations on user name or email must surface
    /// as [`AuthError::UserNameTaken`] / [`AuthError::EmailTaken`] so a
    /// race loser sees the same error as the pre-check.
    ///
    /// [`AuthError::UserNameTaken`]: crate::error::AuthError::UserNameTaken
    /// [`AuthError::EmailTaken`]: crate::error::AuthError::EmailTaken
    async fn create(&self, user: &User) -> AuthResult<()>;

    /// Find user by ID
    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// Find user by user name (canonical form)
    async fn find_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<User>>;

    /// Find user by email
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// Update user
    async fn update(&self, user: &User) -> AuthResult<()>;

    /// Delete user (cascades to the user's reviews and comments)
    async fn delete(&self, user_id: &UserId) -> AuthResult<()>;

    /// List users ordered by user name, optionally filtered by a
    /// substring search on the user name
    async fn list(&self, search: Option<&str>, limit: i64, offset: i64)
    -> AuthResult<Vec<User>>;
}
