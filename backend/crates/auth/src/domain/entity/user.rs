//! User Entity
//!
//! Core identity record. Lifecycle:
//! `Unregistered -> PendingActivation (is_active = false) -> Active`.
//! Users are never hard-deleted by the normal flow; only an admin
//! delete removes the row (cascading the user's reviews and comments).

use chrono::{DateTime, Utc};

use crate::domain::value_object::{Email, UserId, UserName, UserRole};

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    /// Internal UUID identifier
    pub user_id: UserId,
    /// Public handle (unique, used for login and routing)
    pub user_name: UserName,
    /// Email address (unique)
    pub email: Email,
    /// Role (User, Moderator, Admin)
    pub role: UserRole,
    /// False until a confirmation code is redeemed
    pub is_active: bool,
    /// Optional profile text
    pub bio: Option<String>,
    /// Optional given name
    pub first_name: Option<String>,
    /// Optional family name
    pub last_name: Option<String>,
    /// Created timestamp (part of the confirmation-code MAC input)
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new pending user (inactive until confirmed)
    pub fn new(user_name: UserName, email: Email) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            user_name,
            email,
            role: UserRole::default(),
            is_active: false,
            bio: None,
            first_name: None,
            last_name: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Flip to Active. Idempotent: activating an active user is a no-op.
    pub fn activate(&mut self) {
        if !self.is_active {
            self.is_active = true;
            self.updated_at = Utc::now();
        }
    }

    /// Whether the confirmation flow has completed
    pub fn is_activated(&self) -> bool {
        self.is_active
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn is_moderator(&self) -> bool {
        self.role.is_moderator()
    }

    /// Update role (admin-only operation, enforced by the caller)
    pub fn set_role(&mut self, role: UserRole) {
        self.role = role;
        self.updated_at = Utc::now();
    }

    pub fn set_email(&mut self, email: Email) {
        self.email = email;
        self.updated_at = Utc::now();
    }

    pub fn set_bio(&mut self, bio: Option<String>) {
        self.bio = bio;
        self.updated_at = Utc::now();
    }

    pub fn set_first_name(&mut self, first_name: Option<String>) {
        self.first_name = first_name;
        self.updated_at = Utc::now();
    }

    pub fn set_last_name(&mut self, last_name: Option<String>) {
        self.last_name = last_name;
        self.updated_at = Utc::now();
    }
}
