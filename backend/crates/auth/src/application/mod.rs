//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod issue_token;
pub mod manage_users;
pub mod register;

// Re-exports
pub use config::AuthConfig;
pub use issue_token::{IssueTokenInput, IssueTokenOutput, IssueTokenUseCase, RefreshTokenUseCase};
pub use manage_users::{CreateUserInput, UserAdminService, UserPatch};
pub use register::{RegisterInput, RegisterOutput, RegisterUseCase};
