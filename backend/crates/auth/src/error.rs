//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::domain::value_object::{EmailError, UserNameError};

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Required field absent from the request body
    #[error("This field is required")]
    MissingField(&'static str),

    /// User name is reserved for routing (e.g. `me`)
    #[error("User name '{0}' is reserved")]
    ReservedUserName(String),

    /// User name failed validation
    #[error("Invalid user name: {0}")]
    InvalidUserName(String),

    /// Email failed validation
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// User name already registered with a different email
    #[error("A user with this user name already exists with a different email")]
    UserNameTaken,

    /// Email already registered with a different user name
    #[error("A user with this email already exists with a different user name")]
    EmailTaken,

    /// User not found
    #[error("User not found")]
    UserNotFound,

    /// Confirmation code does not validate against the user's state
    #[error("Invalid confirmation code")]
    InvalidConfirmationCode,

    /// Access/refresh token failed verification
    #[error("Invalid or expired token")]
    InvalidToken,

    /// No credentials on a request that requires them
    #[error("Authentication required")]
    Unauthorized,

    /// Authenticated but not allowed
    #[error("Permission denied")]
    PermissionDenied,

    /// Confirmation mail could not be delivered
    #[error("Mail delivery failed: {0}")]
    Delivery(#[from] platform::mailer::MailError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingField(_)
            | AuthError::ReservedUserName(_)
            | AuthError::InvalidUserName(_)
            | AuthError::InvalidEmail(_)
            | AuthError::InvalidConfirmationCode => StatusCode::BAD_REQUEST,
            AuthError::UserNameTaken | AuthError::EmailTaken => StatusCode::CONFLICT,
            AuthError::UserNotFound => StatusCode::NOT_FOUND,
            AuthError::InvalidToken | AuthError::Unauthorized => StatusCode::UNAUTHORIZED,
            AuthError::PermissionDenied => StatusCode::FORBIDDEN,
            AuthError::Delivery(_) => StatusCode::BAD_GATEWAY,
            AuthError::Database(_) | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::MissingField(_)
            | AuthError::ReservedUserName(_)
            | AuthError::InvalidUserName(_)
            | AuthError::InvalidEmail(_)
            | AuthError::InvalidConfirmationCode => ErrorKind::BadRequest,
            AuthError::UserNameTaken | AuthError::EmailTaken => ErrorKind::Conflict,
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::InvalidToken | AuthError::Unauthorized => ErrorKind::Unauthorized,
            AuthError::PermissionDenied => ErrorKind::Forbidden,
            AuthError::Delivery(_) => ErrorKind::BadGateway,
            AuthError::Database(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        let err = AppError::new(self.kind(), self.to_string());
        match self {
            AuthError::MissingField(field) => err.with_field(*field),
            AuthError::ReservedUserName(_) | AuthError::InvalidUserName(_) => {
                err.with_field("username")
            }
            AuthError::InvalidEmail(_) => err.with_field("email"),
            AuthError::InvalidConfirmationCode => err.with_field("confirmation_code"),
            _ => err,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::Delivery(e) => {
                tracing::error!(error = %e, "Confirmation mail delivery failed");
            }
            AuthError::InvalidConfirmationCode => {
                tracing::warn!("Invalid confirmation code presented");
            }
            AuthError::InvalidToken => {
                tracing::warn!("Invalid token presented");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<UserNameError> for AuthError {
    fn from(err: UserNameError) -> Self {
        match err {
            UserNameError::Reserved(name) => AuthError::ReservedUserName(name),
            other => AuthError::InvalidUserName(other.to_string()),
        }
    }
}

impl From<EmailError> for AuthError {
    fn from(err: EmailError) -> Self {
        AuthError::InvalidEmail(err.to_string())
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AuthError::MissingField("email").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::ReservedUserName("me".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AuthError::UserNameTaken.status_code(), StatusCode::CONFLICT);
        assert_eq!(AuthError::EmailTaken.status_code(), StatusCode::CONFLICT);
        assert_eq!(AuthError::UserNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AuthError::InvalidConfirmationCode.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::Unauthorized.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::PermissionDenied.status_code(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_missing_field_carries_field_name() {
        let app_err = AuthError::MissingField("username").to_app_error();
        assert_eq!(app_err.field(), Some("username"));
    }

    #[test]
    fn test_user_name_error_conversion() {
        let err: AuthError = UserNameError::Reserved("me".to_string()).into();
        assert!(matches!(err, AuthError::ReservedUserName(_)));

        let err: AuthError = UserNameError::Empty.into();
        assert!(matches!(err, AuthError::InvalidUserName(_)));
    }
}
