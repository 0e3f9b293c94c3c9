//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entity::{
    Category, Comment, CommentDetails, Genre, Review, ReviewDetails, TitleDetails,
};

// ============================================================================
// Categories / Genres
// ============================================================================

/// Category or genre representation (same shape for both)
#[derive(Debug, Clone, Serialize)]
pub struct NamedSlugResponse {
    pub name: String,
    pub slug: String,
}

impl From<&Category> for NamedSlugResponse {
    fn from(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            slug: category.slug.to_string(),
        }
    }
}

impl From<&Genre> for NamedSlugResponse {
    fn from(genre: &Genre) -> Self {
        Self {
            name: genre.name.clone(),
            slug: genre.slug.to_string(),
        }
    }
}

/// Category/genre creation request
#[derive(Debug, Clone, Deserialize)]
pub struct CreateNamedSlugRequest {
    pub name: Option<String>,
    pub slug: Option<String>,
}

// ============================================================================
// Titles
// ============================================================================

/// Title representation with nested objects and computed rating
#[derive(Debug, Clone, Serialize)]
pub struct TitleResponse {
    pub id: Uuid,
    pub name: String,
    pub year: i32,
    pub rating: Option<f64>,
    pub description: Option<String>,
    pub category: Option<NamedSlugResponse>,
    pub genre: Vec<NamedSlugResponse>,
}

impl From<&TitleDetails> for TitleResponse {
    fn from(details: &TitleDetails) -> Self {
        Self {
            id: details.title.title_id.into_uuid(),
            name: details.title.name.clone(),
            year: details.title.year.value(),
            rating: details.rating,
            description: details.title.description.clone(),
            category: details.category.as_ref().map(Into::into),
            genre: details.genres.iter().map(Into::into).collect(),
        }
    }
}

/// Title creation request (category and genres referenced by slug)
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTitleRequest {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub genre: Vec<String>,
}

/// Partial title update request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TitlePatchRequest {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub genre: Option<Vec<String>>,
}

// ============================================================================
// Reviews
// ============================================================================

/// Review representation
#[derive(Debug, Clone, Serialize)]
pub struct ReviewResponse {
    pub id: Uuid,
    pub text: String,
    pub author: String,
    pub score: i16,
    pub pub_date: DateTime<Utc>,
}

impl ReviewResponse {
    pub fn from_parts(review: &Review, author_name: &str) -> Self {
        Self {
            id: review.review_id.into_uuid(),
            text: review.text.clone(),
            author: author_name.to_string(),
            score: review.score.value(),
            pub_date: review.pub_date,
        }
    }
}

impl From<&ReviewDetails> for ReviewResponse {
    fn from(details: &ReviewDetails) -> Self {
        Self::from_parts(&details.review, &details.author_name)
    }
}

/// Review creation request
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReviewRequest {
    pub text: Option<String>,
    pub score: Option<i16>,
}

/// Partial review update request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewPatchRequest {
    pub text: Option<String>,
    pub score: Option<i16>,
}

// ============================================================================
// Comments
// ============================================================================

/// Comment representation
#[derive(Debug, Clone, Serialize)]
pub struct CommentResponse {
    pub id: Uuid,
    pub text: String,
    pub author: String,
    pub pub_date: DateTime<Utc>,
}

impl CommentResponse {
    pub fn from_parts(comment: &Comment, author_name: &str) -> Self {
        Self {
            id: comment.comment_id.into_uuid(),
            text: comment.text.clone(),
            author: author_name.to_string(),
            pub_date: comment.pub_date,
        }
    }
}

impl From<&CommentDetails> for CommentResponse {
    fn from(details: &CommentDetails) -> Self {
        Self::from_parts(&details.comment, &details.author_name)
    }
}

/// Comment creation / update request
#[derive(Debug, Clone, Deserialize)]
pub struct CommentRequest {
    pub text: Option<String>,
}

// ============================================================================
// Queries
// ============================================================================

/// List query with name search
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Plain paging query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Title list query: paging plus catalog filters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TitleListQuery {
    pub category: Option<String>,
    pub genre: Option<String>,
    pub name: Option<String>,
    pub year: Option<i32>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
