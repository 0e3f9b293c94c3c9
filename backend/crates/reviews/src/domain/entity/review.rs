//! Review Entity
//!
//! At most one review per (title, author); the pair is also unique at
//! the storage level. `pub_date` is server-assigned and never changes.

use chrono::{DateTime, Utc};
use kernel::id::{ReviewId, TitleId, UserId};

use crate::domain::value_object::Score;

/// Maximum review text length
pub const REVIEW_TEXT_MAX_LENGTH: usize = 100;

/// Review entity
#[derive(Debug, Clone)]
pub struct Review {
    pub review_id: ReviewId,
    pub title_id: TitleId,
    pub author_id: UserId,
    pub text: String,
    pub score: Score,
    pub pub_date: DateTime<Utc>,
}

impl Review {
    pub fn new(title_id: TitleId, author_id: UserId, text: String, score: Score) -> Self {
        Self {
            review_id: ReviewId::new(),
            title_id,
            author_id,
            text,
            score,
            pub_date: Utc::now(),
        }
    }
}

/// Review read model carrying the author's display handle
#[derive(Debug, Clone)]
pub struct ReviewDetails {
    pub review: Review,
    pub author_name: String,
}
