//! Token Issuance Use Cases
//!
//! Exchanges a valid confirmation code for an access/refresh token pair
//! (activating the user on first redemption), and refresh tokens for
//! fresh access tokens.

use std::sync::Arc;

use platform::token::{TokenKind, TokenPair};
use uuid::Uuid;

use crate::application::config::AuthConfig;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{UserId, UserName};
use crate::error::{AuthError, AuthResult};

/// Token request input
pub struct IssueTokenInput {
    pub username: Option<String>,
    pub confirmation_code: Option<String>,
}

/// Issued token pair
#[derive(Debug)]
pub struct IssueTokenOutput {
    pub access: String,
    pub refresh: String,
}

/// Confirmation-code redemption use case
pub struct IssueTokenUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> IssueTokenUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, input: IssueTokenInput) -> AuthResult<IssueTokenOutput> {
        let username = input
            .username
            .filter(|s| !s.is_empty())
            .ok_or(AuthError::MissingField("username"))?;
        let code = input
            .confirmation_code
            .filter(|s| !s.is_empty())
            .ok_or(AuthError::MissingField("confirmation_code"))?;

        // A malformed username cannot match any record
        let user_name = UserName::new(username).map_err(|_| AuthError::UserNotFound)?;

        let mut user = self
            .repo
            .find_by_user_name(&user_name)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        // The code is bound to the user's current state: redeeming it
        // below flips is_active, so replays fail here next time.
        if !self.config.codes().check_code(&user, &code) {
            return Err(AuthError::InvalidConfirmationCode);
        }

        if !user.is_activated() {
            user.activate();
            self.repo.update(&user).await?;
            tracing::info!(user_name = %user.user_name, "User activated");
        }

        let TokenPair { access, refresh } =
            self.config.tokens().issue_pair(&user.user_id.to_string());

        Ok(IssueTokenOutput { access, refresh })
    }
}

/// Refresh-token exchange use case
pub struct RefreshTokenUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> RefreshTokenUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    /// Exchange a refresh token for a fresh access token
    pub async fn execute(&self, refresh: Option<String>) -> AuthResult<String> {
        let refresh = refresh
            .filter(|s| !s.is_empty())
            .ok_or(AuthError::MissingField("refresh"))?;

        let tokens = self.config.tokens();
        let subject = tokens
            .verify(&refresh, TokenKind::Refresh)
            .map_err(|_| AuthError::InvalidToken)?;

        let user_id: UserId = Uuid::parse_str(&subject)
            .map(Into::into)
            .map_err(|_| AuthError::InvalidToken)?;

        // The subject must still resolve to a live, activated user
        let user = self
            .repo
            .find_by_id(&user_id)
            .await?
            .filter(|u| u.is_activated())
            .ok_or(AuthError::InvalidToken)?;

        let now_ms = chrono::Utc::now().timestamp_millis();
        Ok(tokens.issue(&user.user_id.to_string(), TokenKind::Access, now_ms))
    }
}
