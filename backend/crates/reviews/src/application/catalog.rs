//! Category / Genre Services
//!
//! Admin-managed reference data. Both resources share the same shape
//! (name + unique slug) and the same rules; the authorization check
//! lives in the handlers via `domain::policy`.

use std::sync::Arc;

use crate::domain::entity::{Category, Genre};
use crate::domain::repository::{CategoryRepository, GenreRepository};
use crate::domain::value_object::Slug;
use crate::error::{ReviewsError, ReviewsResult};

/// Maximum length for category/genre/title names
pub const NAME_MAX_LENGTH: usize = 256;

/// Creation input shared by categories and genres
#[derive(Default)]
pub struct CreateNamedSlugInput {
    pub name: Option<String>,
    pub slug: Option<String>,
}

fn validate_name_slug(input: CreateNamedSlugInput) -> ReviewsResult<(String, Slug)> {
    let name = input
        .name
        .filter(|s| !s.is_empty())
        .ok_or(ReviewsError::MissingField("name"))?;
    let slug = input
        .slug
        .filter(|s| !s.is_empty())
        .ok_or(ReviewsError::MissingField("slug"))?;

    if name.chars().count() > NAME_MAX_LENGTH {
        return Err(ReviewsError::TextTooLong {
            field: "name",
            max: NAME_MAX_LENGTH,
        });
    }

    Ok((name, Slug::new(slug)?))
}

/// Category management service
pub struct CategoryService<R>
where
    R: CategoryRepository,
{
    repo: Arc<R>,
}

impl<R> CategoryService<R>
where
    R: CategoryRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn list(
        &self,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> ReviewsResult<Vec<Category>> {
        self.repo.list_categories(search, limit, offset).await
    }

    pub async fn create(&self, input: CreateNamedSlugInput) -> ReviewsResult<Category> {
        let (name, slug) = validate_name_slug(input)?;

        if self.repo.find_category_by_slug(&slug).await?.is_some() {
            return Err(ReviewsError::SlugTaken);
        }

        let category = Category::new(name, slug);
        self.repo.create_category(&category).await?;

        tracing::info!(slug = %category.slug, "Category created");

        Ok(category)
    }

    pub async fn delete(&self, slug: &str) -> ReviewsResult<()> {
        // A malformed slug cannot match any record
        let slug = Slug::new(slug).map_err(|_| ReviewsError::CategoryNotFound)?;

        if !self.repo.delete_category_by_slug(&slug).await? {
            return Err(ReviewsError::CategoryNotFound);
        }

        tracing::info!(slug = %slug, "Category deleted");
        Ok(())
    }
}

/// Genre management service
pub struct GenreService<R>
where
    R: GenreRepository,
{
    repo: Arc<R>,
}

impl<R> GenreService<R>
where
    R: GenreRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn list(
        &self,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> ReviewsResult<Vec<Genre>> {
        self.repo.list_genres(search, limit, offset).await
    }

    pub async fn create(&self, input: CreateNamedSlugInput) -> ReviewsResult<Genre> {
        let (name, slug) = validate_name_slug(input)?;

        if self.repo.find_genre_by_slug(&slug).await?.is_some() {
            return Err(ReviewsError::SlugTaken);
        }

        let genre = Genre::new(name, slug);
        self.repo.create_genre(&genre).await?;

        tracing::info!(slug = %genre.slug, "Genre created");

        Ok(genre)
    }

    pub async fn delete(&self, slug: &str) -> ReviewsResult<()> {
        let slug = Slug::new(slug).map_err(|_| ReviewsError::GenreNotFound)?;

        if !self.repo.delete_genre_by_slug(&slug).await? {
            return Err(ReviewsError::GenreNotFound);
        }

        tracing::info!(slug = %slug, "Genre deleted");
        Ok(())
    }
}
