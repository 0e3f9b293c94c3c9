//! Title Service
//!
//! Catalog CRUD for reviewable works. Write DTOs reference category and
//! genres by slug; reads come back as [`TitleDetails`] with the nested
//! objects and the computed rating.

use std::sync::Arc;

use chrono::{Datelike, Utc};
use kernel::id::{GenreId, TitleId};

use crate::application::catalog::NAME_MAX_LENGTH;
use crate::domain::entity::{Title, TitleDetails};
use crate::domain::repository::{CategoryRepository, GenreRepository, TitleFilter, TitleRepository};
use crate::domain::value_object::{Slug, TitleYear};
use crate::error::{ReviewsError, ReviewsResult};

/// Title creation input
#[derive(Default)]
pub struct CreateTitleInput {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub genres: Vec<String>,
}

/// Partial title update. `None` leaves a field unchanged.
#[derive(Default)]
pub struct TitlePatch {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub genres: Option<Vec<String>>,
}

/// Title management service
pub struct TitleService<R>
where
    R: TitleRepository + CategoryRepository + GenreRepository,
{
    repo: Arc<R>,
}

impl<R> TitleService<R>
where
    R: TitleRepository + CategoryRepository + GenreRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn list(
        &self,
        filter: &TitleFilter,
        limit: i64,
        offset: i64,
    ) -> ReviewsResult<Vec<TitleDetails>> {
        self.repo.list_titles(filter, limit, offset).await
    }

    pub async fn get(&self, title_id: &TitleId) -> ReviewsResult<TitleDetails> {
        self.repo
            .find_title(title_id)
            .await?
            .ok_or(ReviewsError::TitleNotFound)
    }

    pub async fn create(&self, input: CreateTitleInput) -> ReviewsResult<TitleDetails> {
        let name = input
            .name
            .filter(|s| !s.is_empty())
            .ok_or(ReviewsError::MissingField("name"))?;
        let year = input.year.ok_or(ReviewsError::MissingField("year"))?;

        if name.chars().count() > NAME_MAX_LENGTH {
            return Err(ReviewsError::TextTooLong {
                field: "name",
                max: NAME_MAX_LENGTH,
            });
        }

        let year = TitleYear::new(year, Utc::now().year())?;
        let category_id = match input.category {
            Some(slug) => Some(self.resolve_category(&slug).await?.category_id),
            None => None,
        };
        let genre_ids = self.resolve_genres(&input.genres).await?;

        let title = Title::new(name, year, input.description, category_id);
        self.repo.create_title(&title, &genre_ids).await?;

        tracing::info!(title_id = %title.title_id, name = %title.name, "Title created");

        self.get(&title.title_id).await
    }

    pub async fn update(&self, title_id: &TitleId, patch: TitlePatch) -> ReviewsResult<TitleDetails> {
        let details = self.get(title_id).await?;
        let mut title = details.title;

        if let Some(name) = patch.name {
            if name.chars().count() > NAME_MAX_LENGTH {
                return Err(ReviewsError::TextTooLong {
                    field: "name",
                    max: NAME_MAX_LENGTH,
                });
            }
            title.name = name;
        }
        if let Some(year) = patch.year {
            title.year = TitleYear::new(year, Utc::now().year())?;
        }
        if let Some(description) = patch.description {
            title.description = Some(description);
        }
        if let Some(slug) = patch.category {
            title.category_id = Some(self.resolve_category(&slug).await?.category_id);
        }

        let genre_ids = match patch.genres {
            Some(slugs) => self.resolve_genres(&slugs).await?,
            None => details.genres.iter().map(|g| g.genre_id).collect(),
        };

        self.repo.update_title(&title, &genre_ids).await?;

        self.get(title_id).await
    }

    pub async fn delete(&self, title_id: &TitleId) -> ReviewsResult<()> {
        if !self.repo.delete_title(title_id).await? {
            return Err(ReviewsError::TitleNotFound);
        }

        tracing::info!(title_id = %title_id, "Title deleted");
        Ok(())
    }

    async fn resolve_category(&self, slug: &str) -> ReviewsResult<crate::domain::entity::Category> {
        let slug = Slug::new(slug).map_err(|_| ReviewsError::CategoryNotFound)?;
        self.repo
            .find_category_by_slug(&slug)
            .await?
            .ok_or(ReviewsError::CategoryNotFound)
    }

    async fn resolve_genres(&self, slugs: &[String]) -> ReviewsResult<Vec<GenreId>> {
        let mut genre_ids = Vec::with_capacity(slugs.len());
        for slug in slugs {
            let slug = Slug::new(slug.as_str()).map_err(|_| ReviewsError::GenreNotFound)?;
            let genre = self
                .repo
                .find_genre_by_slug(&slug)
                .await?
                .ok_or(ReviewsError::GenreNotFound)?;
            genre_ids.push(genre.genre_id);
        }
        Ok(genre_ids)
    }
}
