//! Register Use Case
//!
//! Turns a (username, email) pair into a pending user plus a mailed
//! confirmation code. Repeating the request with the identical pair is a
//! resend, not an error; a pair that collides with an existing record on
//! only one of the two fields is a conflict.

use std::sync::Arc;

use platform::mailer::{Mail, Mailer};

use crate::application::config::AuthConfig;
use crate::domain::entity::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{Email, UserName};
use crate::error::{AuthError, AuthResult};

/// Register input. Fields are optional so missing-field errors can name
/// the offending field before any lookup runs.
pub struct RegisterInput {
    pub username: Option<String>,
    pub email: Option<String>,
}

/// Register output
#[derive(Debug)]
pub struct RegisterOutput {
    pub username: String,
    pub email: String,
    /// True when the pair matched an existing record (code re-issued)
    pub resent: bool,
}

/// Register use case
pub struct RegisterUseCase<R, M>
where
    R: UserRepository,
    M: Mailer,
{
    repo: Arc<R>,
    mailer: Arc<M>,
    config: Arc<AuthConfig>,
}

impl<R, M> RegisterUseCase<R, M>
where
    R: UserRepository,
    M: Mailer + Sync,
{
    pub fn new(repo: Arc<R>, mailer: Arc<M>, config: Arc<AuthConfig>) -> Self {
        Self {
            repo,
            mailer,
            config,
        }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<RegisterOutput> {
        // Field presence comes first - before validation and lookups
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

        // Resolve the candidate pair against existing records
        let (user, resent) = match self.repo.find_by_user_name(&user_name).await? {
            Some(existing) if existing.email == email => (existing, true),
            Some(_) => return Err(AuthError::UserNameTaken),
            None => {
                if self.repo.find_by_email(&email).await?.is_some() {
                    return Err(AuthError::EmailTaken);
                }
                let user = User::new(user_name, email);
                // The DB unique constraints close the check/write race;
                // a loser surfaces the same conflict as the pre-check.
                self.repo.create(&user).await?;
                (user, false)
            }
        };

        let code = self.config.codes().make_code(&user);
        self.mailer
            .send(&Mail {
                subject: "Your confirmation code".to_string(),
                body: format!(
                    "Hello {}!\n\nYour confirmation code: {}\n\n\
                     Exchange it for an access token at /api/v1/auth/token.",
                    user.user_name, code
                ),
                from: self.config.mail_from.clone(),
                to: vec![user.email.to_string()],
            })
            .await?;

        tracing::info!(
            user_name = %user.user_name,
            resent,
            "Confirmation code issued"
        );

        Ok(RegisterOutput {
            username: user.user_name.original().to_string(),
            email: user.email.to_string(),
            resent,
        })
    }
}
