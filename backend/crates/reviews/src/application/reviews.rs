//! Review Service
//!
//! One review per (title, author). The duplicate pre-check is backed by
//! a storage unique constraint so race losers fail the same way.

use std::sync::Arc;

use auth::models::UserRole;
use kernel::id::{ReviewId, TitleId, UserId};

use crate::domain::entity::{REVIEW_TEXT_MAX_LENGTH, Review, ReviewDetails};
use crate::domain::policy;
use crate::domain::repository::{ReviewRepository, TitleRepository};
use crate::domain::value_object::Score;
use crate::error::{ReviewsError, ReviewsResult};

/// Review creation input
#[derive(Default)]
pub struct CreateReviewInput {
    pub text: Option<String>,
    pub score: Option<i16>,
}

/// Partial review update. `None` leaves a field unchanged.
#[derive(Default)]
pub struct ReviewPatch {
    pub text: Option<String>,
    pub score: Option<i16>,
}

fn validate_text(text: String) -> ReviewsResult<String> {
    if text.chars().count() > REVIEW_TEXT_MAX_LENGTH {
        return Err(ReviewsError::TextTooLong {
            field: "text",
            max: REVIEW_TEXT_MAX_LENGTH,
        });
    }
    Ok(text)
}

/// Review management service
pub struct ReviewService<R>
where
    R: ReviewRepository + TitleRepository,
{
    repo: Arc<R>,
}

impl<R> ReviewService<R>
where
    R: ReviewRepository + TitleRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn list(
        &self,
        title_id: &TitleId,
        limit: i64,
        offset: i64,
    ) -> ReviewsResult<Vec<ReviewDetails>> {
        self.ensure_title(title_id).await?;
        self.repo.list_reviews(title_id, limit, offset).await
    }

    pub async fn get(
        &self,
        title_id: &TitleId,
        review_id: &ReviewId,
    ) -> ReviewsResult<ReviewDetails> {
        self.ensure_title(title_id).await?;
        self.repo
            .find_review(title_id, review_id)
            .await?
            .ok_or(ReviewsError::ReviewNotFound)
    }

    pub async fn create(
        &self,
        title_id: &TitleId,
        author_id: &UserId,
        input: CreateReviewInput,
    ) -> ReviewsResult<Review> {
        self.ensure_title(title_id).await?;

        let text = input
            .text
            .filter(|s| !s.is_empty())
            .ok_or(ReviewsError::MissingField("text"))?;
        let score = input.score.ok_or(ReviewsError::MissingField("score"))?;

        let text = validate_text(text)?;
        let score = Score::new(score)?;

        if self
            .repo
            .find_review_by_author(title_id, author_id)
            .await?
            .is_some()
        {
            return Err(ReviewsError::DuplicateReview);
        }

        let review = Review::new(*title_id, *author_id, text, score);
        // The DB unique constraint closes the check/write race
        self.repo.create_review(&review).await?;

        tracing::info!(
            review_id = %review.review_id,
            title_id = %title_id,
            "Review created"
        );

        Ok(review)
    }

    pub async fn update(
        &self,
        title_id: &TitleId,
        review_id: &ReviewId,
        requester_id: &UserId,
        requester_role: UserRole,
        patch: ReviewPatch,
    ) -> ReviewsResult<ReviewDetails> {
        let mut details = self.get(title_id, review_id).await?;

        if !policy::can_edit_contribution(requester_role, requester_id, &details.review.author_id) {
            return Err(ReviewsError::PermissionDenied);
        }

        if let Some(text) = patch.text {
            details.review.text = validate_text(text)?;
        }
        if let Some(score) = patch.score {
            details.review.score = Score::new(score)?;
        }

        self.repo.update_review(&details.review).await?;
        Ok(details)
    }

    pub async fn delete(
        &self,
        title_id: &TitleId,
        review_id: &ReviewId,
        requester_id: &UserId,
        requester_role: UserRole,
    ) -> ReviewsResult<()> {
        let details = self.get(title_id, review_id).await?;

        if !policy::can_edit_contribution(requester_role, requester_id, &details.review.author_id) {
            return Err(ReviewsError::PermissionDenied);
        }

        self.repo.delete_review(review_id).await?;

        tracing::info!(review_id = %review_id, title_id = %title_id, "Review deleted");
        Ok(())
    }

    async fn ensure_title(&self, title_id: &TitleId) -> ReviewsResult<()> {
        if self.repo.title_exists(title_id).await? {
            Ok(())
        } else {
            Err(ReviewsError::TitleNotFound)
        }
    }
}
