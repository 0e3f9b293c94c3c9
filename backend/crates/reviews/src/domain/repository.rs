//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::id::{CommentId, GenreId, ReviewId, TitleId, UserId};

use crate::domain::entity::{
    Category, Comment, CommentDetails, Genre, Review, ReviewDetails, Title, TitleDetails,
};
use crate::domain::value_object::Slug;
use crate::error::ReviewsResult;

/// Category repository trait
#[trait_variant::make(CategoryRepository: Send)]
pub trait LocalCategoryRepository {
    /// Create a category. A slug unique-violation must surface as
    /// [`ReviewsError::SlugTaken`].
    ///
    /// [`ReviewsError::SlugTaken`]: crate::error::ReviewsError::SlugTaken
    async fn create_category(&self, category: &Category) -> ReviewsResult<()>;

    async fn find_category_by_slug(&self, slug: &Slug) -> ReviewsResult<Option<Category>>;

    /// Delete by slug; `false` when no such category exists.
    /// Titles referencing it keep their rows with the category unset.
    async fn delete_category_by_slug(&self, slug: &Slug) -> ReviewsResult<bool>;

    async fn list_categories(
        &self,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> ReviewsResult<Vec<Category>>;
}

/// Genre repository trait
#[trait_variant::make(GenreRepository: Send)]
pub trait LocalGenreRepository {
    /// Create a genre. A slug unique-violation must surface as
    /// [`ReviewsError::SlugTaken`].
    ///
    /// [`ReviewsError::SlugTaken`]: crate::error::ReviewsError::SlugTaken
    async fn create_genre(&self, genre: &Genre) -> ReviewsResult<()>;

    async fn find_genre_by_slug(&self, slug: &Slug) -> ReviewsResult<Option<Genre>>;

    /// Delete by slug; `false` when no such genre exists.
    /// Join rows to titles are removed with it.
    async fn delete_genre_by_slug(&self, slug: &Slug) -> ReviewsResult<bool>;

    async fn list_genres(
        &self,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> ReviewsResult<Vec<Genre>>;
}

/// Title list filter. Conditions are conjunctive; `None` matches any.
#[derive(Debug, Clone, Default)]
pub struct TitleFilter {
    /// Exact category slug
    pub category: Option<String>,
    /// Exact genre slug (title must carry the genre)
    pub genre: Option<String>,
    /// Case-insensitive substring of the title name
    pub name: Option<String>,
    /// Exact release year
    pub year: Option<i32>,
}

/// Title repository trait
#[trait_variant::make(TitleRepository: Send)]
pub trait LocalTitleRepository {
    async fn create_title(&self, title: &Title, genre_ids: &[GenreId]) -> ReviewsResult<()>;

    /// Fetch the title with its category, genres, and computed rating
    async fn find_title(&self, title_id: &TitleId) -> ReviewsResult<Option<TitleDetails>>;

    /// Update the row and replace the genre set
    async fn update_title(&self, title: &Title, genre_ids: &[GenreId]) -> ReviewsResult<()>;

    /// Delete; `false` when no such title exists. Reviews cascade.
    async fn delete_title(&self, title_id: &TitleId) -> ReviewsResult<bool>;

    async fn list_titles(
        &self,
        filter: &TitleFilter,
        limit: i64,
        offset: i64,
    ) -> ReviewsResult<Vec<TitleDetails>>;

    async fn title_exists(&self, title_id: &TitleId) -> ReviewsResult<bool>;
}

/// Review repository trait
#[trait_variant::make(ReviewRepository: Send)]
pub trait LocalReviewRepository {
    /// Create a review. A (title, author) unique-violation must surface
    /// as [`ReviewsError::DuplicateReview`].
    ///
    /// [`ReviewsError::DuplicateReview`]: crate::error::ReviewsError::DuplicateReview
    async fn create_review(&self, review: &Review) -> ReviewsResult<()>;

    /// Fetch a review scoped to its title
    async fn find_review(
        &self,
        title_id: &TitleId,
        review_id: &ReviewId,
    ) -> ReviewsResult<Option<ReviewDetails>>;

    async fn find_review_by_author(
        &self,
        title_id: &TitleId,
        author_id: &UserId,
    ) -> ReviewsResult<Option<Review>>;

    async fn update_review(&self, review: &Review) -> ReviewsResult<()>;

    async fn delete_review(&self, review_id: &ReviewId) -> ReviewsResult<()>;

    /// Ordered by publication date, oldest first
    async fn list_reviews(
        &self,
        title_id: &TitleId,
        limit: i64,
        offset: i64,
    ) -> ReviewsResult<Vec<ReviewDetails>>;
}

/// Comment repository trait
#[trait_variant::make(CommentRepository: Send)]
pub trait LocalCommentRepository {
    async fn create_comment(&self, comment: &Comment) -> ReviewsResult<()>;

    /// Fetch a comment scoped to its review
    async fn find_comment(
        &self,
        review_id: &ReviewId,
        comment_id: &CommentId,
    ) -> ReviewsResult<Option<CommentDetails>>;

    async fn update_comment(&self, comment: &Comment) -> ReviewsResult<()>;

    async fn delete_comment(&self, comment_id: &CommentId) -> ReviewsResult<()>;

    /// Ordered by publication date, oldest first
    async fn list_comments(
        &self,
        review_id: &ReviewId,
        limit: i64,
        offset: i64,
    ) -> ReviewsResult<Vec<CommentDetails>>;
}
