//! User Management Service
//!
//! Admin CRUD over user records plus the self-profile operations
//! backing `/users/me`.

use std::sync::Arc;

use crate::domain::entity::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{Email, UserId, UserName, UserRole};
use crate::error::{AuthError, AuthResult};

/// Admin user-creation input
#[derive(Default)]
pub struct CreateUserInput {
    pub username: Option<String>,
    pub email: Option<String>,
    pub role: Option<UserRole>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
}

/// Partial profile update. `None` leaves a field unchanged.
#[derive(Default)]
pub struct UserPatch {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub role: Option<UserRole>,
}

/// User management service
pub struct UserAdminService<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
}

impl<R> UserAdminService<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn list(
        &self,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> AuthResult<Vec<User>> {
        self.repo.list(search, limit, offset).await
    }

    /// Create a user as admin. The account still starts inactive and
    /// goes through the normal confirmation flow.
    pub async fn create(&self, input: CreateUserInput) -> AuthResult<User> {
        let username = input
            .username
            .filter(|s| !s.is_empty())
            .ok_or(AuthError::MissingField("username"))?;
        let email = input
            .email
            .filter(|s| !s.is_empty())
            .ok_or(AuthError::MissingField("email"))?;

        let user_name = UserName::new(username)?;
        let email = Email::new(email)?;

        if self.repo.find_by_user_name(&user_name).await?.is_some() {
            return Err(AuthError::UserNameTaken);
        }
        if self.repo.find_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let mut user = User::new(user_name, email);
        if let Some(role) = input.role {
            user.set_role(role);
        }
        user.first_name = input.first_name;
        user.last_name = input.last_name;
        user.bio = input.bio;

        self.repo.create(&user).await?;

        tracing::info!(user_name = %user.user_name, role = %user.role, "User created by admin");

        Ok(user)
    }

    pub async fn get(&self, username: &str) -> AuthResult<User> {
        let user_name = UserName::new(username).map_err(|_| AuthError::UserNotFound)?;
        self.repo
            .find_by_user_name(&user_name)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    pub async fn get_by_id(&self, user_id: &UserId) -> AuthResult<User> {
        self.repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    /// Apply a partial update to `user`.
    ///
    /// A role change is honored only when the requester is admin;
    /// otherwise it is dropped without failing the request. Ownership
    /// of the other fields is the caller's concern.
    pub async fn update(
        &self,
        mut user: User,
        patch: UserPatch,
        requester_role: UserRole,
    ) -> AuthResult<User> {
        if let Some(email) = patch.email {
            let email = Email::new(email)?;
            if let Some(other) = self.repo.find_by_email(&email).await? {
                if other.user_id != user.user_id {
                    return Err(AuthError::EmailTaken);
                }
            }
            user.set_email(email);
        }
        if let Some(first_name) = patch.first_name {
            user.set_first_name(Some(first_name));
        }
        if let Some(last_name) = patch.last_name {
            user.set_last_name(Some(last_name));
        }
        if let Some(bio) = patch.bio {
            user.set_bio(Some(bio));
        }
        if let Some(role) = patch.role {
            if requester_role.is_admin() {
                user.set_role(role);
            } else {
                // The role field is ignored, not rejected, for
                // non-admin self-updates.
                tracing::debug!(
                    user_name = %user.user_name,
                    requested_role = %role,
                    "Role change dropped from non-admin profile update"
                );
            }
        }

        self.repo.update(&user).await?;
        Ok(user)
    }

    pub async fn delete(&self, username: &str) -> AuthResult<()> {
        let user = self.get(username).await?;
        self.repo.delete(&user.user_id).await?;
        tracing::info!(user_name = %user.user_name, "User deleted by admin");
        Ok(())
    }
}
