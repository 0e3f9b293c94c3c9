//! Reviews Error Types
//!
//! Catalog-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::domain::value_object::{ScoreError, SlugError, TitleYearError};

/// Reviews-specific result type alias
pub type ReviewsResult<T> = Result<T, ReviewsError>;

/// Reviews-specific error variants
#[derive(Debug, Error)]
pub enum ReviewsError {
    /// Required field absent from the request body
    #[error("This field is required")]
    MissingField(&'static str),

    /// Slug failed validation
    #[error("Invalid slug: {0}")]
    InvalidSlug(String),

    /// Slug already in use within the resource
    #[error("A resource with this slug already exists")]
    SlugTaken,

    /// Text field exceeds its limit
    #[error("Field '{field}' must be at most {max} characters")]
    TextTooLong { field: &'static str, max: usize },

    /// Title year outside the accepted range
    #[error("Year {0} is out of range")]
    YearOutOfRange(i32),

    /// Review score outside 1..=10
    #[error("Score {0} is out of range (must be 1-10)")]
    ScoreOutOfRange(i16),

    /// The requester already reviewed this title
    #[error("You have already reviewed this title")]
    DuplicateReview,

    /// Category not found
    #[error("Category not found")]
    CategoryNotFound,

    /// Genre not found
    #[error("Genre not found")]
    GenreNotFound,

    /// Title not found
    #[error("Title not found")]
    TitleNotFound,

    /// Review not found (or not under the given title)
    #[error("Review not found")]
    ReviewNotFound,

    /// Comment not found (or not under the given review)
    #[error("Comment not found")]
    CommentNotFound,

    /// Authenticated but not allowed
    #[error("Permission denied")]
    PermissionDenied,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ReviewsError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ReviewsError::MissingField(_)
            | ReviewsError::InvalidSlug(_)
            | ReviewsError::TextTooLong { .. }
            | ReviewsError::YearOutOfRange(_)
            | ReviewsError::ScoreOutOfRange(_) => StatusCode::BAD_REQUEST,
            ReviewsError::SlugTaken | ReviewsError::DuplicateReview => StatusCode::CONFLICT,
            ReviewsError::CategoryNotFound
            | ReviewsError::GenreNotFound
            | ReviewsError::TitleNotFound
            | ReviewsError::ReviewNotFound
            | ReviewsError::CommentNotFound => StatusCode::NOT_FOUND,
            ReviewsError::PermissionDenied => StatusCode::FORBIDDEN,
            ReviewsError::Database(_) | ReviewsError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReviewsError::MissingField(_)
            | ReviewsError::InvalidSlug(_)
            | ReviewsError::TextTooLong { .. }
            | ReviewsError::YearOutOfRange(_)
            | ReviewsError::ScoreOutOfRange(_) => ErrorKind::BadRequest,
            ReviewsError::SlugTaken | ReviewsError::DuplicateReview => ErrorKind::Conflict,
            ReviewsError::CategoryNotFound
            | ReviewsError::GenreNotFound
            | ReviewsError::TitleNotFound
            | ReviewsError::ReviewNotFound
            | ReviewsError::CommentNotFound => ErrorKind::NotFound,
            ReviewsError::PermissionDenied => ErrorKind::Forbidden,
            ReviewsError::Database(_) | ReviewsError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        let err = AppError::new(self.kind(), self.to_string());
        match self {
            ReviewsError::MissingField(field) => err.with_field(*field),
            ReviewsError::InvalidSlug(_) | ReviewsError::SlugTaken => err.with_field("slug"),
            ReviewsError::TextTooLong { field, .. } => err.with_field(*field),
            ReviewsError::YearOutOfRange(_) => err.with_field("year"),
            ReviewsError::ScoreOutOfRange(_) => err.with_field("score"),
            _ => err,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            ReviewsError::Database(e) => {
                tracing::error!(error = %e, "Reviews database error");
            }
            ReviewsError::Internal(msg) => {
                tracing::error!(message = %msg, "Reviews internal error");
            }
            _ => {
                tracing::debug!(error = %self, "Reviews error");
            }
        }
    }
}

impl IntoResponse for ReviewsError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<SlugError> for ReviewsError {
    fn from(err: SlugError) -> Self {
        ReviewsError::InvalidSlug(err.to_string())
    }
}

impl From<ScoreError> for ReviewsError {
    fn from(err: ScoreError) -> Self {
        let ScoreError::OutOfRange(score) = err;
        ReviewsError::ScoreOutOfRange(score)
    }
}

impl From<TitleYearError> for ReviewsError {
    fn from(err: TitleYearError) -> Self {
        let TitleYearError::OutOfRange(year) = err;
        ReviewsError::YearOutOfRange(year)
    }
}

impl From<AppError> for ReviewsError {
    fn from(err: AppError) -> Self {
        ReviewsError::Internal(err.to_string())
    }
}
