//! Comment Service
//!
//! Comments hang off a review; every operation first resolves the
//! (title, review) pair so a comment is never reachable under the
//! wrong parent path.

use std::sync::Arc;

use auth::models::UserRole;
use kernel::id::{CommentId, ReviewId, TitleId, UserId};

use crate::domain::entity::{COMMENT_TEXT_MAX_LENGTH, Comment, CommentDetails};
use crate::domain::policy;
use crate::domain::repository::{CommentRepository, ReviewRepository, TitleRepository};
use crate::error::{ReviewsError, ReviewsResult};

/// Comment creation / update input
#[derive(Default)]
pub struct CommentInput {
    pub text: Option<String>,
}

fn validate_text(text: String) -> ReviewsResult<String> {
    if text.chars().count() > COMMENT_TEXT_MAX_LENGTH {
        return Err(ReviewsError::TextTooLong {
            field: "text",
            max: COMMENT_TEXT_MAX_LENGTH,
        });
    }
    Ok(text)
}

/// Comment management service
pub struct CommentService<R>
where
    R: CommentRepository + ReviewRepository + TitleRepository,
{
    repo: Arc<R>,
}

impl<R> CommentService<R>
where
    R: CommentRepository + ReviewRepository + TitleRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn list(
        &self,
        title_id: &TitleId,
        review_id: &ReviewId,
        limit: i64,
        offset: i64,
    ) -> ReviewsResult<Vec<CommentDetails>> {
        self.ensure_review(title_id, review_id).await?;
        self.repo.list_comments(review_id, limit, offset).await
    }

    pub async fn get(
        &self,
        title_id: &TitleId,
        review_id: &ReviewId,
        comment_id: &CommentId,
    ) -> ReviewsResult<CommentDetails> {
        self.ensure_review(title_id, review_id).await?;
        self.repo
            .find_comment(review_id, comment_id)
            .await?
            .ok_or(ReviewsError::CommentNotFound)
    }

    pub async fn create(
        &self,
        title_id: &TitleId,
        review_id: &ReviewId,
        author_id: &UserId,
        input: CommentInput,
    ) -> ReviewsResult<Comment> {
        self.ensure_review(title_id, review_id).await?;

        let text = input
            .text
            .filter(|s| !s.is_empty())
            .ok_or(ReviewsError::MissingField("text"))?;
        let text = validate_text(text)?;

        let comment = Comment::new(*review_id, *author_id, text);
        self.repo.create_comment(&comment).await?;

        tracing::info!(
            comment_id = %comment.comment_id,
            review_id = %review_id,
            "Comment created"
        );

        Ok(comment)
    }

    pub async fn update(
        &self,
        title_id: &TitleId,
        review_id: &ReviewId,
        comment_id: &CommentId,
        requester_id: &UserId,
        requester_role: UserRole,
        input: CommentInput,
    ) -> ReviewsResult<CommentDetails> {
        let mut details = self.get(title_id, review_id, comment_id).await?;

        if !policy::can_edit_contribution(requester_role, requester_id, &details.comment.author_id)
        {
            return Err(ReviewsError::PermissionDenied);
        }

        if let Some(text) = input.text {
            details.comment.text = validate_text(text)?;
        }

        self.repo.update_comment(&details.comment).await?;
        Ok(details)
    }

    pub async fn delete(
        &self,
        title_id: &TitleId,
        review_id: &ReviewId,
        comment_id: &CommentId,
        requester_id: &UserId,
        requester_role: UserRole,
    ) -> ReviewsResult<()> {
        let details = self.get(title_id, review_id, comment_id).await?;

        if !policy::can_edit_contribution(requester_role, requester_id, &details.comment.author_id)
        {
            return Err(ReviewsError::PermissionDenied);
        }

        self.repo.delete_comment(comment_id).await?;

        tracing::info!(comment_id = %comment_id, review_id = %review_id, "Comment deleted");
        Ok(())
    }

    async fn ensure_review(&self, title_id: &TitleId, review_id: &ReviewId) -> ReviewsResult<()> {
        if self
            .repo
            .find_review(title_id, review_id)
            .await?
            .is_some()
        {
            Ok(())
        } else {
            Err(ReviewsError::ReviewNotFound)
        }
    }
}
