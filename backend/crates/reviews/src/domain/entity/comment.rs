//! Comment Entity
//!
//! Attached to exactly one review; cascade-deleted with it.

use chrono::{DateTime, Utc};
use kernel::id::{CommentId, ReviewId, UserId};

/// Maximum comment text length
pub const COMMENT_TEXT_MAX_LENGTH: usize = 200;

/// Comment entity
#[derive(Debug, Clone)]
pub struct Comment {
    pub comment_id: CommentId,
    pub review_id: ReviewId,
    pub author_id: UserId,
    pub text: String,
    pub pub_date: DateTime<Utc>,
}

impl Comment {
    pub fn new(review_id: ReviewId, author_id: UserId, text: String) -> Self {
        Self {
            comment_id: CommentId::new(),
            review_id,
            author_id,
            text,
            pub_date: Utc::now(),
        }
    }
}

/// Comment read model carrying the author's display handle
#[derive(Debug, Clone)]
pub struct CommentDetails {
    pub comment: Comment,
    pub author_name: String,
}
