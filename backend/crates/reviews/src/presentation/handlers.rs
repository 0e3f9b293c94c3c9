//! HTTP Handlers
//!
//! Reads are public; catalog writes require admin and contribution
//! writes require an authenticated requester (ownership checks happen
//! in the services).

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use std::sync::Arc;
use uuid::Uuid;

use auth::CurrentUser;
use kernel::id::{CommentId, ReviewId, TitleId};

use crate::application::{
    CategoryService, CommentInput, CommentService, CreateNamedSlugInput, CreateReviewInput,
    CreateTitleInput, GenreService, ReviewPatch, ReviewService, TitlePatch, TitleService,
};
use crate::domain::policy;
use crate::domain::repository::{
    CategoryRepository, CommentRepository, GenreRepository, ReviewRepository, TitleFilter,
    TitleRepository,
};
use crate::error::{ReviewsError, ReviewsResult};
use crate::presentation::dto::{
    CommentRequest, CommentResponse, CreateNamedSlugRequest, CreateReviewRequest,
    CreateTitleRequest, NamedSlugResponse, PageQuery, ReviewPatchRequest, ReviewResponse,
    SearchQuery, TitleListQuery, TitlePatchRequest, TitleResponse,
};

/// Default page size for list endpoints
const DEFAULT_PAGE_LIMIT: i64 = 20;

/// Hard cap on page size
const MAX_PAGE_LIMIT: i64 = 100;

/// Everything the catalog handlers need from storage
pub trait CatalogStore:
    CategoryRepository
    + GenreRepository
    + TitleRepository
    + ReviewRepository
    + CommentRepository
    + Send
    + Sync
    + 'static
{
}

impl<T> CatalogStore for T where
    T: CategoryRepository
        + GenreRepository
        + TitleRepository
        + ReviewRepository
        + CommentRepository
        + Send
        + Sync
        + 'static
{
}

/// Shared state for catalog handlers
pub struct ReviewsAppState<R> {
    pub repo: Arc<R>,
}

impl<R> ReviewsAppState<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo: Arc::new(repo),
        }
    }
}

// Manual Clone: the derive would demand R: Clone
impl<R> Clone for ReviewsAppState<R> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
        }
    }
}

fn require_catalog_admin(user: &CurrentUser) -> ReviewsResult<()> {
    if policy::can_manage_catalog(user.role) {
        Ok(())
    } else {
        Err(ReviewsError::PermissionDenied)
    }
}

fn page_bounds(limit: Option<i64>, offset: Option<i64>) -> (i64, i64) {
    let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT);
    let offset = offset.unwrap_or(0).max(0);
    (limit, offset)
}

// ============================================================================
// Categories
// ============================================================================

/// GET /api/v1/categories
pub async fn list_categories<R: CatalogStore>(
    State(state): State<ReviewsAppState<R>>,
    Query(query): Query<SearchQuery>,
) -> ReviewsResult<Json<Vec<NamedSlugResponse>>> {
    let (limit, offset) = page_bounds(query.limit, query.offset);
    let categories = CategoryService::new(state.repo.clone())
        .list(query.search.as_deref(), limit, offset)
        .await?;

    Ok(Json(categories.iter().map(Into::into).collect()))
}

/// POST /api/v1/categories
pub async fn create_category<R: CatalogStore>(
    State(state): State<ReviewsAppState<R>>,
    requester: CurrentUser,
    Json(req): Json<CreateNamedSlugRequest>,
) -> ReviewsResult<(StatusCode, Json<NamedSlugResponse>)> {
    require_catalog_admin(&requester)?;

    let category = CategoryService::new(state.repo.clone())
        .create(CreateNamedSlugInput {
            name: req.name,
            slug: req.slug,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(NamedSlugResponse::from(&category))))
}

/// DELETE /api/v1/categories/{slug}
pub async fn delete_category<R: CatalogStore>(
    State(state): State<ReviewsAppState<R>>,
    requester: CurrentUser,
    Path(slug): Path<String>,
) -> ReviewsResult<StatusCode> {
    require_catalog_admin(&requester)?;

    CategoryService::new(state.repo.clone()).delete(&slug).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Genres
// ============================================================================

/// GET /api/v1/genres
pub async fn list_genres<R: CatalogStore>(
    State(state): State<ReviewsAppState<R>>,
    Query(query): Query<SearchQuery>,
) -> ReviewsResult<Json<Vec<NamedSlugResponse>>> {
    let (limit, offset) = page_bounds(query.limit, query.offset);
    let genres = GenreService::new(state.repo.clone())
        .list(query.search.as_deref(), limit, offset)
        .await?;

    Ok(Json(genres.iter().map(Into::into).collect()))
}

/// POST /api/v1/genres
pub async fn create_genre<R: CatalogStore>(
    State(state): State<ReviewsAppState<R>>,
    requester: CurrentUser,
    Json(req): Json<CreateNamedSlugRequest>,
) -> ReviewsResult<(StatusCode, Json<NamedSlugResponse>)> {
    require_catalog_admin(&requester)?;

    let genre = GenreService::new(state.repo.clone())
        .create(CreateNamedSlugInput {
            name: req.name,
            slug: req.slug,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(NamedSlugResponse::from(&genre))))
}

/// DELETE /api/v1/genres/{slug}
pub async fn delete_genre<R: CatalogStore>(
    State(state): State<ReviewsAppState<R>>,
    requester: CurrentUser,
    Path(slug): Path<String>,
) -> ReviewsResult<StatusCode> {
    require_catalog_admin(&requester)?;

    GenreService::new(state.repo.clone()).delete(&slug).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Titles
// ============================================================================

/// GET /api/v1/titles
pub async fn list_titles<R: CatalogStore>(
    State(state): State<ReviewsAppState<R>>,
    Query(query): Query<TitleListQuery>,
) -> ReviewsResult<Json<Vec<TitleResponse>>> {
    let (limit, offset) = page_bounds(query.limit, query.offset);
    let filter = TitleFilter {
        category: query.category,
        genre: query.genre,
        name: query.name,
        year: query.year,
    };
    let titles = TitleService::new(state.repo.clone())
        .list(&filter, limit, offset)
        .await?;

    Ok(Json(titles.iter().map(Into::into).collect()))
}

/// POST /api/v1/titles
pub async fn create_title<R: CatalogStore>(
    State(state): State<ReviewsAppState<R>>,
    requester: CurrentUser,
    Json(req): Json<CreateTitleRequest>,
) -> ReviewsResult<(StatusCode, Json<TitleResponse>)> {
    require_catalog_admin(&requester)?;

    let details = TitleService::new(state.repo.clone())
        .create(CreateTitleInput {
            name: req.name,
            year: req.year,
            description: req.description,
            category: req.category,
            genres: req.genre,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(TitleResponse::from(&details))))
}

/// GET /api/v1/titles/{title_id}
pub async fn get_title<R: CatalogStore>(
    State(state): State<ReviewsAppState<R>>,
    Path(title_id): Path<Uuid>,
) -> ReviewsResult<Json<TitleResponse>> {
    let details = TitleService::new(state.repo.clone())
        .get(&TitleId::from_uuid(title_id))
        .await?;

    Ok(Json(TitleResponse::from(&details)))
}

/// PATCH /api/v1/titles/{title_id}
pub async fn patch_title<R: CatalogStore>(
    State(state): State<ReviewsAppState<R>>,
    requester: CurrentUser,
    Path(title_id): Path<Uuid>,
    Json(req): Json<TitlePatchRequest>,
) -> ReviewsResult<Json<TitleResponse>> {
    require_catalog_admin(&requester)?;

    let details = TitleService::new(state.repo.clone())
        .update(
            &TitleId::from_uuid(title_id),
            TitlePatch {
                name: req.name,
                year: req.year,
                description: req.description,
                category: req.category,
                genres: req.genre,
            },
        )
        .await?;

    Ok(Json(TitleResponse::from(&details)))
}

/// DELETE /api/v1/titles/{title_id}
pub async fn delete_title<R: CatalogStore>(
    State(state): State<ReviewsAppState<R>>,
    requester: CurrentUser,
    Path(title_id): Path<Uuid>,
) -> ReviewsResult<StatusCode> {
    require_catalog_admin(&requester)?;

    TitleService::new(state.repo.clone())
        .delete(&TitleId::from_uuid(title_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Reviews
// ============================================================================

/// GET /api/v1/titles/{title_id}/reviews
pub async fn list_reviews<R: CatalogStore>(
    State(state): State<ReviewsAppState<R>>,
    Path(title_id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> ReviewsResult<Json<Vec<ReviewResponse>>> {
    let (limit, offset) = page_bounds(query.limit, query.offset);
    let reviews = ReviewService::new(state.repo.clone())
        .list(&TitleId::from_uuid(title_id), limit, offset)
        .await?;

    Ok(Json(reviews.iter().map(Into::into).collect()))
}

/// POST /api/v1/titles/{title_id}/reviews
pub async fn create_review<R: CatalogStore>(
    State(state): State<ReviewsAppState<R>>,
    requester: CurrentUser,
    Path(title_id): Path<Uuid>,
    Json(req): Json<CreateReviewRequest>,
) -> ReviewsResult<(StatusCode, Json<ReviewResponse>)> {
    let review = ReviewService::new(state.repo.clone())
        .create(
            &TitleId::from_uuid(title_id),
            &requester.user_id,
            CreateReviewInput {
                text: req.text,
                score: req.score,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ReviewResponse::from_parts(&review, &requester.user_name)),
    ))
}

/// GET /api/v1/titles/{title_id}/reviews/{review_id}
pub async fn get_review<R: CatalogStore>(
    State(state): State<ReviewsAppState<R>>,
    Path((title_id, review_id)): Path<(Uuid, Uuid)>,
) -> ReviewsResult<Json<ReviewResponse>> {
    let details = ReviewService::new(state.repo.clone())
        .get(&TitleId::from_uuid(title_id), &ReviewId::from_uuid(review_id))
        .await?;

    Ok(Json(ReviewResponse::from(&details)))
}

/// PATCH /api/v1/titles/{title_id}/reviews/{review_id}
pub async fn patch_review<R: CatalogStore>(
    State(state): State<ReviewsAppState<R>>,
    requester: CurrentUser,
    Path((title_id, review_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<ReviewPatchRequest>,
) -> ReviewsResult<Json<ReviewResponse>> {
    let details = ReviewService::new(state.repo.clone())
        .update(
            &TitleId::from_uuid(title_id),
            &ReviewId::from_uuid(review_id),
            &requester.user_id,
            requester.role,
            ReviewPatch {
                text: req.text,
                score: req.score,
            },
        )
        .await?;

    Ok(Json(ReviewResponse::from(&details)))
}

/// DELETE /api/v1/titles/{title_id}/reviews/{review_id}
pub async fn delete_review<R: CatalogStore>(
    State(state): State<ReviewsAppState<R>>,
    requester: CurrentUser,
    Path((title_id, review_id)): Path<(Uuid, Uuid)>,
) -> ReviewsResult<StatusCode> {
    ReviewService::new(state.repo.clone())
        .delete(
            &TitleId::from_uuid(title_id),
            &ReviewId::from_uuid(review_id),
            &requester.user_id,
            requester.role,
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Comments
// ============================================================================

/// GET /api/v1/titles/{title_id}/reviews/{review_id}/comments
pub async fn list_comments<R: CatalogStore>(
    State(state): State<ReviewsAppState<R>>,
    Path((title_id, review_id)): Path<(Uuid, Uuid)>,
    Query(query): Query<PageQuery>,
) -> ReviewsResult<Json<Vec<CommentResponse>>> {
    let (limit, offset) = page_bounds(query.limit, query.offset);
    let comments = CommentService::new(state.repo.clone())
        .list(
            &TitleId::from_uuid(title_id),
            &ReviewId::from_uuid(review_id),
            limit,
            offset,
        )
        .await?;

    Ok(Json(comments.iter().map(Into::into).collect()))
}

/// POST /api/v1/titles/{title_id}/reviews/{review_id}/comments
pub async fn create_comment<R: CatalogStore>(
    State(state): State<ReviewsAppState<R>>,
    requester: CurrentUser,
    Path((title_id, review_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<CommentRequest>,
) -> ReviewsResult<(StatusCode, Json<CommentResponse>)> {
    let comment = CommentService::new(state.repo.clone())
        .create(
            &TitleId::from_uuid(title_id),
            &ReviewId::from_uuid(review_id),
            &requester.user_id,
            CommentInput { text: req.text },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CommentResponse::from_parts(&comment, &requester.user_name)),
    ))
}

/// GET /api/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}
pub async fn get_comment<R: CatalogStore>(
    State(state): State<ReviewsAppState<R>>,
    Path((title_id, review_id, comment_id)): Path<(Uuid, Uuid, Uuid)>,
) -> ReviewsResult<Json<CommentResponse>> {
    let details = CommentService::new(state.repo.clone())
        .get(
            &TitleId::from_uuid(title_id),
            &ReviewId::from_uuid(review_id),
            &CommentId::from_uuid(comment_id),
        )
        .await?;

    Ok(Json(CommentResponse::from(&details)))
}

/// PATCH /api/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}
pub async fn patch_comment<R: CatalogStore>(
    State(state): State<ReviewsAppState<R>>,
    requester: CurrentUser,
    Path((title_id, review_id, comment_id)): Path<(Uuid, Uuid, Uuid)>,
    Json(req): Json<CommentRequest>,
) -> ReviewsResult<Json<CommentResponse>> {
    let details = CommentService::new(state.repo.clone())
        .update(
            &TitleId::from_uuid(title_id),
            &ReviewId::from_uuid(review_id),
            &CommentId::from_uuid(comment_id),
            &requester.user_id,
            requester.role,
            CommentInput { text: req.text },
        )
        .await?;

    Ok(Json(CommentResponse::from(&details)))
}

/// DELETE /api/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}
pub async fn delete_comment<R: CatalogStore>(
    State(state): State<ReviewsAppState<R>>,
    requester: CurrentUser,
    Path((title_id, review_id, comment_id)): Path<(Uuid, Uuid, Uuid)>,
) -> ReviewsResult<StatusCode> {
    CommentService::new(state.repo.clone())
        .delete(
            &TitleId::from_uuid(title_id),
            &ReviewId::from_uuid(review_id),
            &CommentId::from_uuid(comment_id),
            &requester.user_id,
            requester.role,
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
