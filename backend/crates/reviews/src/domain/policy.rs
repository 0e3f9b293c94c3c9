//! Authorization Policy
//!
//! Resource-level rules derived from `UserRole` and ownership only.
//! Catalog writes are admin territory; reviews and comments belong to
//! their author but moderators and admins may edit or remove them.

use auth::models::UserRole;
use kernel::id::UserId;

/// Whether `role` may create, change, or delete catalog resources
/// (categories, genres, titles)
pub fn can_manage_catalog(role: UserRole) -> bool {
    role.is_admin()
}

/// Whether a requester may update or delete a review or comment.
/// Ownership is fixed at creation; there is no transfer.
pub fn can_edit_contribution(role: UserRole, requester_id: &UserId, author_id: &UserId) -> bool {
    role.is_moderator_or_higher() || requester_id == author_id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_admin_only() {
        assert!(can_manage_catalog(UserRole::Admin));
        assert!(!can_manage_catalog(UserRole::Moderator));
        assert!(!can_manage_catalog(UserRole::User));
    }

    #[test]
    fn test_contribution_edit_matrix() {
        let author = UserId::new();
        let other = UserId::new();

        // Author edits own work regardless of role
        assert!(can_edit_contribution(UserRole::User, &author, &author));

        // A plain user cannot touch someone else's work
        assert!(!can_edit_contribution(UserRole::User, &other, &author));

        // Moderators and admins can
        assert!(can_edit_contribution(UserRole::Moderator, &other, &author));
        assert!(can_edit_contribution(UserRole::Admin, &other, &author));
    }
}
