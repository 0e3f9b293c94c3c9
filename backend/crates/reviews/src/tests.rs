//! Unit tests for the reviews crate
//!
//! Service-level tests run against an in-memory store; no database
//! required.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use auth::models::UserRole;
use kernel::id::{CommentId, GenreId, ReviewId, TitleId, UserId};
use uuid::Uuid;

use crate::application::{
    CategoryService, CommentInput, CommentService, CreateNamedSlugInput, CreateReviewInput,
    CreateTitleInput, GenreService, ReviewPatch, ReviewService, TitlePatch, TitleService,
};
use crate::domain::entity::{
    Category, Comment, CommentDetails, Genre, Review, ReviewDetails, Title, TitleDetails,
};
use crate::domain::repository::{
    CategoryRepository, CommentRepository, GenreRepository, ReviewRepository, TitleFilter,
    TitleRepository,
};
use crate::domain::value_object::Slug;
use crate::error::{ReviewsError, ReviewsResult};

// ============================================================================
// In-memory store
// ============================================================================

#[derive(Default)]
struct Inner {
    categories: Vec<Category>,
    genres: Vec<Genre>,
    titles: Vec<(Title, Vec<GenreId>)>,
    reviews: Vec<Review>,
    comments: Vec<Comment>,
    user_names: HashMap<Uuid, String>,
}

#[derive(Default)]
struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    fn add_user(&self, name: &str) -> UserId {
        let user_id = UserId::new();
        self.inner
            .lock()
            .unwrap()
            .user_names
            .insert(user_id.into_uuid(), name.to_string());
        user_id
    }

    fn author_name(inner: &Inner, author_id: &UserId) -> String {
        inner
            .user_names
            .get(author_id.as_uuid())
            .cloned()
            .unwrap_or_default()
    }

    fn details_for(inner: &Inner, title: &Title, genre_ids: &[GenreId]) -> TitleDetails {
        let scores: Vec<i16> = inner
            .reviews
            .iter()
            .filter(|r| r.title_id == title.title_id)
            .map(|r| r.score.value())
            .collect();
        let rating = if scores.is_empty() {
            None
        } else {
            Some(scores.iter().map(|&s| f64::from(s)).sum::<f64>() / scores.len() as f64)
        };

        let category = title
            .category_id
            .and_then(|id| inner.categories.iter().find(|c| c.category_id == id))
            .cloned();
        let genres = inner
            .genres
            .iter()
            .filter(|g| genre_ids.contains(&g.genre_id))
            .cloned()
            .collect();

        TitleDetails {
            title: title.clone(),
            category,
            genres,
            rating,
        }
    }
}

impl CategoryRepository for MemoryStore {
    async fn create_category(&self, category: &Category) -> ReviewsResult<()> {
        let mut inner = self.inner.lock().unwrap();
        if inner.categories.iter().any(|c| c.slug == category.slug) {
            return Err(ReviewsError::SlugTaken);
        }
        inner.categories.push(category.clone());
        Ok(())
    }

    async fn find_category_by_slug(&self, slug: &Slug) -> ReviewsResult<Option<Category>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.categories.iter().find(|c| &c.slug == slug).cloned())
    }

    async fn delete_category_by_slug(&self, slug: &Slug) -> ReviewsResult<bool> {
        let mut inner = self.inner.lock().unwrap();
        let Some(pos) = inner.categories.iter().position(|c| &c.slug == slug) else {
            return Ok(false);
        };
        let category = inner.categories.remove(pos);
        // Mirrors ON DELETE SET NULL
        for (title, _) in inner.titles.iter_mut() {
            if title.category_id == Some(category.category_id) {
                title.category_id = None;
            }
        }
        Ok(true)
    }

    async fn list_categories(
        &self,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> ReviewsResult<Vec<Category>> {
        let inner = self.inner.lock().unwrap();
        let mut categories: Vec<Category> = inner.categories.clone();
        if let Some(term) = search {
            let term = term.to_lowercase();
            categories.retain(|c| c.name.to_lowercase().contains(&term));
        }
        categories.sort_by(|a, b| a.slug.as_str().cmp(b.slug.as_str()));
        Ok(categories
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }
}

impl GenreRepository for MemoryStore {
    async fn create_genre(&self, genre: &Genre) -> ReviewsResult<()> {
        let mut inner = self.inner.lock().unwrap();
        if inner.genres.iter().any(|g| g.slug == genre.slug) {
            return Err(ReviewsError::SlugTaken);
        }
        inner.genres.push(genre.clone());
        Ok(())
    }

    async fn find_genre_by_slug(&self, slug: &Slug) -> ReviewsResult<Option<Genre>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.genres.iter().find(|g| &g.slug == slug).cloned())
    }

    async fn delete_genre_by_slug(&self, slug: &Slug) -> ReviewsResult<bool> {
        let mut inner = self.inner.lock().unwrap();
        let Some(pos) = inner.genres.iter().position(|g| &g.slug == slug) else {
            return Ok(false);
        };
        let genre = inner.genres.remove(pos);
        // Mirrors cascade on the join table
        for (_, genre_ids) in inner.titles.iter_mut() {
            genre_ids.retain(|id| *id != genre.genre_id);
        }
        Ok(true)
    }

    async fn list_genres(
        &self,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> ReviewsResult<Vec<Genre>> {
        let inner = self.inner.lock().unwrap();
        let mut genres: Vec<Genre> = inner.genres.clone();
        if let Some(term) = search {
            let term = term.to_lowercase();
            genres.retain(|g| g.name.to_lowercase().contains(&term));
        }
        genres.sort_by(|a, b| a.slug.as_str().cmp(b.slug.as_str()));
        Ok(genres
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }
}

impl TitleRepository for MemoryStore {
    async fn create_title(&self, title: &Title, genre_ids: &[GenreId]) -> ReviewsResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.titles.push((title.clone(), genre_ids.to_vec()));
        Ok(())
    }

    async fn find_title(&self, title_id: &TitleId) -> ReviewsResult<Option<TitleDetails>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .titles
            .iter()
            .find(|(t, _)| &t.title_id == title_id)
            .map(|(t, ids)| MemoryStore::details_for(&inner, t, ids)))
    }

    async fn update_title(&self, title: &Title, genre_ids: &[GenreId]) -> ReviewsResult<()> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(entry) = inner
            .titles
            .iter_mut()
            .find(|(t, _)| t.title_id == title.title_id)
        {
            *entry = (title.clone(), genre_ids.to_vec());
        }
        Ok(())
    }

    async fn delete_title(&self, title_id: &TitleId) -> ReviewsResult<bool> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.titles.len();
        inner.titles.retain(|(t, _)| &t.title_id != title_id);
        if inner.titles.len() == before {
            return Ok(false);
        }
        // Mirrors cascades: reviews go with the title, comments with reviews
        let dead: Vec<ReviewId> = inner
            .reviews
            .iter()
            .filter(|r| &r.title_id == title_id)
            .map(|r| r.review_id)
            .collect();
        inner.reviews.retain(|r| &r.title_id != title_id);
        inner.comments.retain(|c| !dead.contains(&c.review_id));
        Ok(true)
    }

    async fn list_titles(
        &self,
        filter: &TitleFilter,
        limit: i64,
        offset: i64,
    ) -> ReviewsResult<Vec<TitleDetails>> {
        let inner = self.inner.lock().unwrap();
        let mut details: Vec<TitleDetails> = inner
            .titles
            .iter()
            .map(|(t, ids)| MemoryStore::details_for(&inner, t, ids))
            .collect();
        if let Some(slug) = &filter.category {
            details.retain(|d| d.category.as_ref().is_some_and(|c| c.slug.as_str() == slug));
        }
        if let Some(slug) = &filter.genre {
            details.retain(|d| d.genres.iter().any(|g| g.slug.as_str() == slug));
        }
        if let Some(name) = &filter.name {
            let name = name.to_lowercase();
            details.retain(|d| d.title.name.to_lowercase().contains(&name));
        }
        if let Some(year) = filter.year {
            details.retain(|d| d.title.year.value() == year);
        }
        details.sort_by(|a, b| a.title.name.cmp(&b.title.name));
        Ok(details
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn title_exists(&self, title_id: &TitleId) -> ReviewsResult<bool> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.titles.iter().any(|(t, _)| &t.title_id == title_id))
    }
}

impl ReviewRepository for MemoryStore {
    async fn create_review(&self, review: &Review) -> ReviewsResult<()> {
        let mut inner = self.inner.lock().unwrap();
        if inner
            .reviews
            .iter()
            .any(|r| r.title_id == review.title_id && r.author_id == review.author_id)
        {
            return Err(ReviewsError::DuplicateReview);
        }
        inner.reviews.push(review.clone());
        Ok(())
    }

    async fn find_review(
        &self,
        title_id: &TitleId,
        review_id: &ReviewId,
    ) -> ReviewsResult<Option<ReviewDetails>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .reviews
            .iter()
            .find(|r| &r.title_id == title_id && &r.review_id == review_id)
            .map(|r| ReviewDetails {
                review: r.clone(),
                author_name: MemoryStore::author_name(&inner, &r.author_id),
            }))
    }

    async fn find_review_by_author(
        &self,
        title_id: &TitleId,
        author_id: &UserId,
    ) -> ReviewsResult<Option<Review>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .reviews
            .iter()
            .find(|r| &r.title_id == title_id && &r.author_id == author_id)
            .cloned())
    }

    async fn update_review(&self, review: &Review) -> ReviewsResult<()> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(stored) = inner
            .reviews
            .iter_mut()
            .find(|r| r.review_id == review.review_id)
        {
            *stored = review.clone();
        }
        Ok(())
    }

    async fn delete_review(&self, review_id: &ReviewId) -> ReviewsResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.reviews.retain(|r| &r.review_id != review_id);
        inner.comments.retain(|c| &c.review_id != review_id);
        Ok(())
    }

    async fn list_reviews(
        &self,
        title_id: &TitleId,
        limit: i64,
        offset: i64,
    ) -> ReviewsResult<Vec<ReviewDetails>> {
        let inner = self.inner.lock().unwrap();
        let mut reviews: Vec<&Review> = inner
            .reviews
            .iter()
            .filter(|r| &r.title_id == title_id)
            .collect();
        reviews.sort_by_key(|r| r.pub_date);
        Ok(reviews
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .map(|r| ReviewDetails {
                review: r.clone(),
                author_name: MemoryStore::author_name(&inner, &r.author_id),
            })
            .collect())
    }
}

impl CommentRepository for MemoryStore {
    async fn create_comment(&self, comment: &Comment) -> ReviewsResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.comments.push(comment.clone());
        Ok(())
    }

    async fn find_comment(
        &self,
        review_id: &ReviewId,
        comment_id: &CommentId,
    ) -> ReviewsResult<Option<CommentDetails>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .comments
            .iter()
            .find(|c| &c.review_id == review_id && &c.comment_id == comment_id)
            .map(|c| CommentDetails {
                comment: c.clone(),
                author_name: MemoryStore::author_name(&inner, &c.author_id),
            }))
    }

    async fn update_comment(&self, comment: &Comment) -> ReviewsResult<()> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(stored) = inner
            .comments
            .iter_mut()
            .find(|c| c.comment_id == comment.comment_id)
        {
            *stored = comment.clone();
        }
        Ok(())
    }

    async fn delete_comment(&self, comment_id: &CommentId) -> ReviewsResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.comments.retain(|c| &c.comment_id != comment_id);
        Ok(())
    }

    async fn list_comments(
        &self,
        review_id: &ReviewId,
        limit: i64,
        offset: i64,
    ) -> ReviewsResult<Vec<CommentDetails>> {
        let inner = self.inner.lock().unwrap();
        let mut comments: Vec<&Comment> = inner
            .comments
            .iter()
            .filter(|c| &c.review_id == review_id)
            .collect();
        comments.sort_by_key(|c| c.pub_date);
        Ok(comments
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .map(|c| CommentDetails {
                comment: c.clone(),
                author_name: MemoryStore::author_name(&inner, &c.author_id),
            })
            .collect())
    }
}

// ============================================================================
// Harness
// ============================================================================

struct Harness {
    repo: Arc<MemoryStore>,
}

impl Harness {
    fn new() -> Self {
        Self {
            repo: Arc::new(MemoryStore::default()),
        }
    }

    fn categories(&self) -> CategoryService<MemoryStore> {
        CategoryService::new(self.repo.clone())
    }

    fn genres(&self) -> GenreService<MemoryStore> {
        GenreService::new(self.repo.clone())
    }

    fn titles(&self) -> TitleService<MemoryStore> {
        TitleService::new(self.repo.clone())
    }

    fn reviews(&self) -> ReviewService<MemoryStore> {
        ReviewService::new(self.repo.clone())
    }

    fn comments(&self) -> CommentService<MemoryStore> {
        CommentService::new(self.repo.clone())
    }

    async fn make_title(&self, name: &str) -> TitleId {
        let details = self
            .titles()
            .create(CreateTitleInput {
                name: Some(name.to_string()),
                year: Some(1999),
                ..Default::default()
            })
            .await
            .expect("title creation failed");
        details.title.title_id
    }

    async fn make_review(&self, title_id: &TitleId, author_id: &UserId, score: i16) -> ReviewId {
        let review = self
            .reviews()
            .create(
                title_id,
                author_id,
                CreateReviewInput {
                    text: Some("solid".to_string()),
                    score: Some(score),
                },
            )
            .await
            .expect("review creation failed");
        review.review_id
    }
}

// ============================================================================
// Catalog
// ============================================================================

#[cfg(test)]
mod catalog_tests {
    use super::*;

    #[tokio::test]
    async fn test_category_create_and_slug_conflict() {
        let h = Harness::new();
        h.categories()
            .create(CreateNamedSlugInput {
                name: Some("Films".to_string()),
                slug: Some("films".to_string()),
            })
            .await
            .unwrap();

        let err = h
            .categories()
            .create(CreateNamedSlugInput {
                name: Some("Other films".to_string()),
                slug: Some("films".to_string()),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ReviewsError::SlugTaken));
    }

    #[tokio::test]
    async fn test_category_rejects_bad_input() {
        let h = Harness::new();

        let err = h
            .categories()
            .create(CreateNamedSlugInput {
                name: None,
                slug: Some("films".to_string()),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ReviewsError::MissingField("name")));

        let err = h
            .categories()
            .create(CreateNamedSlugInput {
                name: Some("Films".to_string()),
                slug: Some("Bad Slug!".to_string()),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ReviewsError::InvalidSlug(_)));
    }

    #[tokio::test]
    async fn test_category_delete_unlinks_titles() {
        let h = Harness::new();
        h.categories()
            .create(CreateNamedSlugInput {
                name: Some("Films".to_string()),
                slug: Some("films".to_string()),
            })
            .await
            .unwrap();

        let details = h
            .titles()
            .create(CreateTitleInput {
                name: Some("Heat".to_string()),
                year: Some(1995),
                category: Some("films".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(details.category.is_some());

        h.categories().delete("films").await.unwrap();

        let details = h.titles().get(&details.title.title_id).await.unwrap();
        assert!(details.category.is_none());
        assert!(details.title.category_id.is_none());
    }

    #[tokio::test]
    async fn test_genre_delete_detaches_from_titles() {
        let h = Harness::new();
        h.genres()
            .create(CreateNamedSlugInput {
                name: Some("Drama".to_string()),
                slug: Some("drama".to_string()),
            })
            .await
            .unwrap();

        let details = h
            .titles()
            .create(CreateTitleInput {
                name: Some("Heat".to_string()),
                year: Some(1995),
                genres: vec!["drama".to_string()],
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(details.genres.len(), 1);

        h.genres().delete("drama").await.unwrap();

        let details = h.titles().get(&details.title.title_id).await.unwrap();
        assert!(details.genres.is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let h = Harness::new();
        assert!(matches!(
            h.categories().delete("ghost").await.unwrap_err(),
            ReviewsError::CategoryNotFound
        ));
        assert!(matches!(
            h.genres().delete("ghost").await.unwrap_err(),
            ReviewsError::GenreNotFound
        ));
    }
}

// ============================================================================
// Titles
// ============================================================================

#[cfg(test)]
mod title_tests {
    use super::*;
    use chrono::{Datelike, Utc};

    #[tokio::test]
    async fn test_year_boundaries() {
        let h = Harness::new();
        let current = Utc::now().year();

        // Current year is in the future for release purposes
        let err = h
            .titles()
            .create(CreateTitleInput {
                name: Some("Next".to_string()),
                year: Some(current),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ReviewsError::YearOutOfRange(_)));

        let err = h
            .titles()
            .create(CreateTitleInput {
                name: Some("Prehistoric".to_string()),
                year: Some(-5501),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ReviewsError::YearOutOfRange(-5501)));

        // Boundary values that pass
        for year in [-5500, current - 1] {
            h.titles()
                .create(CreateTitleInput {
                    name: format!("Y{year}").into(),
                    year: Some(year),
                    ..Default::default()
                })
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_unknown_category_or_genre() {
        let h = Harness::new();

        let err = h
            .titles()
            .create(CreateTitleInput {
                name: Some("Heat".to_string()),
                year: Some(1995),
                category: Some("ghost".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ReviewsError::CategoryNotFound));

        let err = h
            .titles()
            .create(CreateTitleInput {
                name: Some("Heat".to_string()),
                year: Some(1995),
                genres: vec!["ghost".to_string()],
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ReviewsError::GenreNotFound));
    }

    #[tokio::test]
    async fn test_patch_keeps_unnamed_fields() {
        let h = Harness::new();
        let title_id = h.make_title("Heat").await;

        let details = h
            .titles()
            .update(
                &title_id,
                TitlePatch {
                    description: Some("A heist film".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(details.title.name, "Heat");
        assert_eq!(details.title.year.value(), 1999);
        assert_eq!(details.title.description.as_deref(), Some("A heist film"));
    }

    /// Heat (1995, films, drama) and Ronin (1998, uncategorized)
    async fn seed_catalog(h: &Harness) -> (TitleId, TitleId) {
        h.categories()
            .create(CreateNamedSlugInput {
                name: Some("Films".to_string()),
                slug: Some("films".to_string()),
            })
            .await
            .unwrap();
        h.genres()
            .create(CreateNamedSlugInput {
                name: Some("Drama".to_string()),
                slug: Some("drama".to_string()),
            })
            .await
            .unwrap();

        let heat = h
            .titles()
            .create(CreateTitleInput {
                name: Some("Heat".to_string()),
                year: Some(1995),
                category: Some("films".to_string()),
                genres: vec!["drama".to_string()],
                ..Default::default()
            })
            .await
            .unwrap();
        let ronin = h
            .titles()
            .create(CreateTitleInput {
                name: Some("Ronin".to_string()),
                year: Some(1998),
                ..Default::default()
            })
            .await
            .unwrap();
        (heat.title.title_id, ronin.title.title_id)
    }

    #[tokio::test]
    async fn test_list_titles_filters_by_category() {
        let h = Harness::new();
        let (heat, _) = seed_catalog(&h).await;

        let filter = TitleFilter {
            category: Some("films".to_string()),
            ..Default::default()
        };
        let listed = h.titles().list(&filter, 20, 0).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title.title_id, heat);

        let filter = TitleFilter {
            category: Some("books".to_string()),
            ..Default::default()
        };
        assert!(h.titles().list(&filter, 20, 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_titles_filters_by_genre() {
        let h = Harness::new();
        let (heat, _) = seed_catalog(&h).await;

        let filter = TitleFilter {
            genre: Some("drama".to_string()),
            ..Default::default()
        };
        let listed = h.titles().list(&filter, 20, 0).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title.title_id, heat);
    }

    #[tokio::test]
    async fn test_list_titles_filters_by_name() {
        let h = Harness::new();
        let (_, ronin) = seed_catalog(&h).await;

        // Substring match, case-insensitive
        let filter = TitleFilter {
            name: Some("oni".to_string()),
            ..Default::default()
        };
        let listed = h.titles().list(&filter, 20, 0).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title.title_id, ronin);
    }

    #[tokio::test]
    async fn test_list_titles_filters_by_year() {
        let h = Harness::new();
        let (_, ronin) = seed_catalog(&h).await;

        let filter = TitleFilter {
            year: Some(1998),
            ..Default::default()
        };
        let listed = h.titles().list(&filter, 20, 0).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title.title_id, ronin);

        // Filters combine conjunctively
        let filter = TitleFilter {
            year: Some(1998),
            category: Some("films".to_string()),
            ..Default::default()
        };
        assert!(h.titles().list(&filter, 20, 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_titles_unfiltered_returns_all() {
        let h = Harness::new();
        seed_catalog(&h).await;

        let listed = h
            .titles()
            .list(&TitleFilter::default(), 20, 0)
            .await
            .unwrap();
        assert_eq!(listed.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_cascades_reviews_and_comments() {
        let h = Harness::new();
        let author = h.repo.add_user("alice");
        let title_id = h.make_title("Heat").await;
        let review_id = h.make_review(&title_id, &author, 8).await;
        h.comments()
            .create(
                &title_id,
                &review_id,
                &author,
                CommentInput {
                    text: Some("agreed".to_string()),
                },
            )
            .await
            .unwrap();

        h.titles().delete(&title_id).await.unwrap();

        assert!(h.repo.inner.lock().unwrap().reviews.is_empty());
        assert!(h.repo.inner.lock().unwrap().comments.is_empty());
    }
}

// ============================================================================
// Reviews & rating
// ============================================================================

#[cfg(test)]
mod review_tests {
    use super::*;

    #[tokio::test]
    async fn test_rating_is_mean_of_scores() {
        let h = Harness::new();
        let title_id = h.make_title("Heat").await;

        // No reviews yet: rating absent, not zero
        let details = h.titles().get(&title_id).await.unwrap();
        assert_eq!(details.rating, None);

        for (name, score) in [("alice", 8), ("bob", 10), ("carol", 6)] {
            let author = h.repo.add_user(name);
            h.make_review(&title_id, &author, score).await;
        }

        let details = h.titles().get(&title_id).await.unwrap();
        assert_eq!(details.rating, Some(8.0));
    }

    #[tokio::test]
    async fn test_one_review_per_author_per_title() {
        let h = Harness::new();
        let author = h.repo.add_user("alice");
        let title_id = h.make_title("Heat").await;
        h.make_review(&title_id, &author, 8).await;

        let err = h
            .reviews()
            .create(
                &title_id,
                &author,
                CreateReviewInput {
                    text: Some("changed my mind".to_string()),
                    score: Some(3),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ReviewsError::DuplicateReview));

        // The same author may review a different title
        let other_title = h.make_title("Ronin").await;
        h.make_review(&other_title, &author, 7).await;
    }

    #[tokio::test]
    async fn test_score_boundaries() {
        let h = Harness::new();
        let title_id = h.make_title("Heat").await;

        for score in [0, 11, -1] {
            let author = h.repo.add_user("x");
            let err = h
                .reviews()
                .create(
                    &title_id,
                    &author,
                    CreateReviewInput {
                        text: Some("t".to_string()),
                        score: Some(score),
                    },
                )
                .await
                .unwrap_err();
            assert!(matches!(err, ReviewsError::ScoreOutOfRange(_)), "{score}");
        }
    }

    #[tokio::test]
    async fn test_review_text_limit() {
        let h = Harness::new();
        let author = h.repo.add_user("alice");
        let title_id = h.make_title("Heat").await;

        let err = h
            .reviews()
            .create(
                &title_id,
                &author,
                CreateReviewInput {
                    text: Some("x".repeat(101)),
                    score: Some(8),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ReviewsError::TextTooLong {
                field: "text",
                max: 100
            }
        ));
    }

    #[tokio::test]
    async fn test_review_under_missing_title() {
        let h = Harness::new();
        let author = h.repo.add_user("alice");

        let err = h
            .reviews()
            .create(
                &TitleId::new(),
                &author,
                CreateReviewInput {
                    text: Some("t".to_string()),
                    score: Some(5),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ReviewsError::TitleNotFound));
    }

    #[tokio::test]
    async fn test_edit_permission_matrix() {
        let h = Harness::new();
        let author = h.repo.add_user("alice");
        let stranger = h.repo.add_user("bob");
        let title_id = h.make_title("Heat").await;
        let review_id = h.make_review(&title_id, &author, 8).await;

        // A stranger with the plain role is rejected
        let err = h
            .reviews()
            .update(
                &title_id,
                &review_id,
                &stranger,
                UserRole::User,
                ReviewPatch {
                    score: Some(1),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ReviewsError::PermissionDenied));

        // The author may edit their own review
        let details = h
            .reviews()
            .update(
                &title_id,
                &review_id,
                &author,
                UserRole::User,
                ReviewPatch {
                    score: Some(9),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(details.review.score.value(), 9);

        // A moderator may delete someone else's review
        h.reviews()
            .delete(&title_id, &review_id, &stranger, UserRole::Moderator)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_reviews_listed_in_publication_order() {
        let h = Harness::new();
        let title_id = h.make_title("Heat").await;
        let first = h.make_review(&title_id, &h.repo.add_user("alice"), 8).await;
        let second = h.make_review(&title_id, &h.repo.add_user("bob"), 6).await;

        let listed = h.reviews().list(&title_id, 20, 0).await.unwrap();
        assert_eq!(listed[0].review.review_id, first);
        assert_eq!(listed[1].review.review_id, second);
    }

    #[tokio::test]
    async fn test_review_scoped_to_title() {
        let h = Harness::new();
        let author = h.repo.add_user("alice");
        let title_a = h.make_title("Heat").await;
        let title_b = h.make_title("Ronin").await;
        let review_id = h.make_review(&title_a, &author, 8).await;

        // The review is not reachable under another title's path
        let err = h.reviews().get(&title_b, &review_id).await.unwrap_err();
        assert!(matches!(err, ReviewsError::ReviewNotFound));
    }
}

// ============================================================================
// Comments
// ============================================================================

#[cfg(test)]
mod comment_tests {
    use super::*;

    #[tokio::test]
    async fn test_comment_lifecycle() {
        let h = Harness::new();
        let author = h.repo.add_user("alice");
        let title_id = h.make_title("Heat").await;
        let review_id = h.make_review(&title_id, &author, 8).await;

        let comment = h
            .comments()
            .create(
                &title_id,
                &review_id,
                &author,
                CommentInput {
                    text: Some("agreed".to_string()),
                },
            )
            .await
            .unwrap();

        let details = h
            .comments()
            .get(&title_id, &review_id, &comment.comment_id)
            .await
            .unwrap();
        assert_eq!(details.comment.text, "agreed");
        assert_eq!(details.author_name, "alice");

        h.comments()
            .delete(
                &title_id,
                &review_id,
                &comment.comment_id,
                &author,
                UserRole::User,
            )
            .await
            .unwrap();

        let err = h
            .comments()
            .get(&title_id, &review_id, &comment.comment_id)
            .await
            .unwrap_err();
        assert!(matches!(err, ReviewsError::CommentNotFound));
    }

    #[tokio::test]
    async fn test_comment_text_limit() {
        let h = Harness::new();
        let author = h.repo.add_user("alice");
        let title_id = h.make_title("Heat").await;
        let review_id = h.make_review(&title_id, &author, 8).await;

        let err = h
            .comments()
            .create(
                &title_id,
                &review_id,
                &author,
                CommentInput {
                    text: Some("x".repeat(201)),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ReviewsError::TextTooLong {
                field: "text",
                max: 200
            }
        ));
    }

    #[tokio::test]
    async fn test_comments_listed_in_publication_order() {
        let h = Harness::new();
        let author = h.repo.add_user("alice");
        let title_id = h.make_title("Heat").await;
        let review_id = h.make_review(&title_id, &author, 8).await;

        let mut ids = Vec::new();
        for text in ["first", "second"] {
            let comment = h
                .comments()
                .create(
                    &title_id,
                    &review_id,
                    &author,
                    CommentInput {
                        text: Some(text.to_string()),
                    },
                )
                .await
                .unwrap();
            ids.push(comment.comment_id);
        }

        let listed = h
            .comments()
            .list(&title_id, &review_id, 20, 0)
            .await
            .unwrap();
        assert_eq!(listed[0].comment.comment_id, ids[0]);
        assert_eq!(listed[1].comment.comment_id, ids[1]);
    }

    #[tokio::test]
    async fn test_comment_under_missing_review() {
        let h = Harness::new();
        let author = h.repo.add_user("alice");
        let title_id = h.make_title("Heat").await;

        let err = h
            .comments()
            .create(
                &title_id,
                &ReviewId::new(),
                &author,
                CommentInput {
                    text: Some("hello".to_string()),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ReviewsError::ReviewNotFound));
    }

    #[tokio::test]
    async fn test_stranger_cannot_edit_comment() {
        let h = Harness::new();
        let author = h.repo.add_user("alice");
        let stranger = h.repo.add_user("bob");
        let title_id = h.make_title("Heat").await;
        let review_id = h.make_review(&title_id, &author, 8).await;
        let comment = h
            .comments()
            .create(
                &title_id,
                &review_id,
                &author,
                CommentInput {
                    text: Some("mine".to_string()),
                },
            )
            .await
            .unwrap();

        let err = h
            .comments()
            .update(
                &title_id,
                &review_id,
                &comment.comment_id,
                &stranger,
                UserRole::User,
                CommentInput {
                    text: Some("defaced".to_string()),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ReviewsError::PermissionDenied));
    }
}
