//! PostgreSQL Repository Implementation
//!
//! A single pool-backed store implements every catalog repository
//! trait. Ratings are never stored; reads compute the mean score with
//! SQL `AVG` so the value always reflects the current review set.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use kernel::id::{CategoryId, CommentId, GenreId, ReviewId, TitleId, UserId};

use crate::domain::entity::{
    Category, Comment, CommentDetails, Genre, Review, ReviewDetails, Title, TitleDetails,
};
use crate::domain::repository::{
    CategoryRepository, CommentRepository, GenreRepository, ReviewRepository, TitleFilter,
    TitleRepository,
};
use crate::domain::value_object::{Score, Slug, TitleYear};
use crate::error::{ReviewsError, ReviewsResult};

/// PostgreSQL-backed catalog repository
#[derive(Clone)]
pub struct PgCatalogRepository {
    pool: PgPool,
}

impl PgCatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn genres_for_title(&self, title_id: &TitleId) -> ReviewsResult<Vec<Genre>> {
        let rows = sqlx::query_as::<_, GenreRow>(
            r#"
            SELECT g.genre_id, g.name, g.slug
            FROM genres g
            JOIN title_genres tg ON tg.genre_id = g.genre_id
            WHERE tg.title_id = $1
            ORDER BY g.slug
            "#,
        )
        .bind(title_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(GenreRow::into_genre).collect())
    }

    async fn title_details_from_row(&self, row: TitleRow) -> ReviewsResult<TitleDetails> {
        let title_id = TitleId::from_uuid(row.title_id);
        let genres = self.genres_for_title(&title_id).await?;
        Ok(row.into_details(genres))
    }
}

// ============================================================================
// Category Repository Implementation
// ============================================================================

impl CategoryRepository for PgCatalogRepository {
    async fn create_category(&self, category: &Category) -> ReviewsResult<()> {
        sqlx::query("INSERT INTO categories (category_id, name, slug) VALUES ($1, $2, $3)")
            .bind(category.category_id.as_uuid())
            .bind(&category.name)
            .bind(category.slug.as_str())
            .execute(&self.pool)
            .await
            .map_err(translate_unique_violation)?;

        Ok(())
    }

    async fn find_category_by_slug(&self, slug: &Slug) -> ReviewsResult<Option<Category>> {
        let row = sqlx::query_as::<_, CategoryRow>(
            "SELECT category_id, name, slug FROM categories WHERE slug = $1",
        )
        .bind(slug.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(CategoryRow::into_category))
    }

    async fn delete_category_by_slug(&self, slug: &Slug) -> ReviewsResult<bool> {
        let deleted = sqlx::query("DELETE FROM categories WHERE slug = $1")
            .bind(slug.as_str())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }

    async fn list_categories(
        &self,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> ReviewsResult<Vec<Category>> {
        let rows = list_named_slug_rows::<CategoryRow>(
            &self.pool,
            "SELECT category_id, name, slug FROM categories",
            search,
            limit,
            offset,
        )
        .await?;

        Ok(rows.into_iter().map(CategoryRow::into_category).collect())
    }
}

// ============================================================================
// Genre Repository Implementation
// ============================================================================

impl GenreRepository for PgCatalogRepository {
    async fn create_genre(&self, genre: &Genre) -> ReviewsResult<()> {
        sqlx::query("INSERT INTO genres (genre_id, name, slug) VALUES ($1, $2, $3)")
            .bind(genre.genre_id.as_uuid())
            .bind(&genre.name)
            .bind(genre.slug.as_str())
            .execute(&self.pool)
            .await
            .map_err(translate_unique_violation)?;

        Ok(())
    }

    async fn find_genre_by_slug(&self, slug: &Slug) -> ReviewsResult<Option<Genre>> {
        let row = sqlx::query_as::<_, GenreRow>(
            "SELECT genre_id, name, slug FROM genres WHERE slug = $1",
        )
        .bind(slug.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(GenreRow::into_genre))
    }

    async fn delete_genre_by_slug(&self, slug: &Slug) -> ReviewsResult<bool> {
        let deleted = sqlx::query("DELETE FROM genres WHERE slug = $1")
            .bind(slug.as_str())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }

    async fn list_genres(
        &self,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> ReviewsResult<Vec<Genre>> {
        let rows = list_named_slug_rows::<GenreRow>(
            &self.pool,
            "SELECT genre_id, name, slug FROM genres",
            search,
            limit,
            offset,
        )
        .await?;

        Ok(rows.into_iter().map(GenreRow::into_genre).collect())
    }
}

async fn list_named_slug_rows<T>(
    pool: &PgPool,
    base_select: &str,
    search: Option<&str>,
    limit: i64,
    offset: i64,
) -> ReviewsResult<Vec<T>>
where
    T: for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin,
{
    let rows = match search {
        Some(term) => {
            sqlx::query_as::<_, T>(&format!(
                "{base_select} WHERE name ILIKE '%' || $1 || '%' ORDER BY slug LIMIT $2 OFFSET $3"
            ))
            .bind(term)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, T>(&format!("{base_select} ORDER BY slug LIMIT $1 OFFSET $2"))
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
                .await?
        }
    };

    Ok(rows)
}

// ============================================================================
// Title Repository Implementation
// ============================================================================

const TITLE_SELECT: &str = r#"
    SELECT
        t.title_id,
        t.name,
        t.year,
        t.description,
        t.category_id,
        c.name AS category_name,
        c.slug AS category_slug,
        (SELECT AVG(r.score)::float8 FROM reviews r WHERE r.title_id = t.title_id) AS rating
    FROM titles t
    LEFT JOIN categories c ON c.category_id = t.category_id
"#;

impl TitleRepository for PgCatalogRepository {
    async fn create_title(&self, title: &Title, genre_ids: &[GenreId]) -> ReviewsResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO titles (title_id, name, year, description, category_id)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(title.title_id.as_uuid())
        .bind(&title.name)
        .bind(title.year.value())
        .bind(title.description.as_deref())
        .bind(title.category_id.map(|id| id.into_uuid()))
        .execute(&mut *tx)
        .await?;

        for genre_id in genre_ids {
            sqlx::query("INSERT INTO title_genres (title_id, genre_id) VALUES ($1, $2)")
                .bind(title.title_id.as_uuid())
                .bind(genre_id.as_uuid())
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn find_title(&self, title_id: &TitleId) -> ReviewsResult<Option<TitleDetails>> {
        let row =
            sqlx::query_as::<_, TitleRow>(&format!("{TITLE_SELECT} WHERE t.title_id = $1"))
                .bind(title_id.as_uuid())
                .fetch_optional(&self.pool)
                .await?;

        match row {
            Some(row) => Ok(Some(self.title_details_from_row(row).await?)),
            None => Ok(None),
        }
    }

    async fn update_title(&self, title: &Title, genre_ids: &[GenreId]) -> ReviewsResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE titles SET
                name = $2,
                year = $3,
                description = $4,
                category_id = $5
            WHERE title_id = $1
            "#,
        )
        .bind(title.title_id.as_uuid())
        .bind(&title.name)
        .bind(title.year.value())
        .bind(title.description.as_deref())
        .bind(title.category_id.map(|id| id.into_uuid()))
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM title_genres WHERE title_id = $1")
            .bind(title.title_id.as_uuid())
            .execute(&mut *tx)
            .await?;

        for genre_id in genre_ids {
            sqlx::query("INSERT INTO title_genres (title_id, genre_id) VALUES ($1, $2)")
                .bind(title.title_id.as_uuid())
                .bind(genre_id.as_uuid())
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn delete_title(&self, title_id: &TitleId) -> ReviewsResult<bool> {
        let deleted = sqlx::query("DELETE FROM titles WHERE title_id = $1")
            .bind(title_id.as_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }

    async fn list_titles(
        &self,
        filter: &TitleFilter,
        limit: i64,
        offset: i64,
    ) -> ReviewsResult<Vec<TitleDetails>> {
        let rows = sqlx::query_as::<_, TitleRow>(&format!(
            r#"{TITLE_SELECT}
            WHERE ($1::text IS NULL OR c.slug = $1)
              AND ($2::text IS NULL OR EXISTS (
                    SELECT 1 FROM title_genres tg
                    JOIN genres g ON g.genre_id = tg.genre_id
                    WHERE tg.title_id = t.title_id AND g.slug = $2))
              AND ($3::text IS NULL OR t.name ILIKE '%' || $3 || '%')
              AND ($4::int4 IS NULL OR t.year = $4)
            ORDER BY t.name LIMIT $5 OFFSET $6
            "#
        ))
        .bind(filter.category.as_deref())
        .bind(filter.genre.as_deref())
        .bind(filter.name.as_deref())
        .bind(filter.year)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let mut details = Vec::with_capacity(rows.len());
        for row in rows {
            details.push(self.title_details_from_row(row).await?);
        }
        Ok(details)
    }

    async fn title_exists(&self, title_id: &TitleId) -> ReviewsResult<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM titles WHERE title_id = $1)")
                .bind(title_id.as_uuid())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }
}

// ============================================================================
// Review Repository Implementation
// ============================================================================

const REVIEW_SELECT: &str = r#"
    SELECT
        r.review_id,
        r.title_id,
        r.author_id,
        r.text,
        r.score,
        r.pub_date,
        u.user_name AS author_name
    FROM reviews r
    JOIN users u ON u.user_id = r.author_id
"#;

impl ReviewRepository for PgCatalogRepository {
    async fn create_review(&self, review: &Review) -> ReviewsResult<()> {
        sqlx::query(
            r#"
            INSERT INTO reviews (review_id, title_id, author_id, text, score, pub_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(review.review_id.as_uuid())
        .bind(review.title_id.as_uuid())
        .bind(review.author_id.as_uuid())
        .bind(&review.text)
        .bind(review.score.value())
        .bind(review.pub_date)
        .execute(&self.pool)
        .await
        .map_err(translate_unique_violation)?;

        Ok(())
    }

    async fn find_review(
        &self,
        title_id: &TitleId,
        review_id: &ReviewId,
    ) -> ReviewsResult<Option<ReviewDetails>> {
        let row = sqlx::query_as::<_, ReviewRow>(&format!(
            "{REVIEW_SELECT} WHERE r.title_id = $1 AND r.review_id = $2"
        ))
        .bind(title_id.as_uuid())
        .bind(review_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ReviewRow::into_details))
    }

    async fn find_review_by_author(
        &self,
        title_id: &TitleId,
        author_id: &UserId,
    ) -> ReviewsResult<Option<Review>> {
        let row = sqlx::query_as::<_, ReviewRow>(&format!(
            "{REVIEW_SELECT} WHERE r.title_id = $1 AND r.author_id = $2"
        ))
        .bind(title_id.as_uuid())
        .bind(author_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_details().review))
    }

    async fn update_review(&self, review: &Review) -> ReviewsResult<()> {
        sqlx::query("UPDATE reviews SET text = $2, score = $3 WHERE review_id = $1")
            .bind(review.review_id.as_uuid())
            .bind(&review.text)
            .bind(review.score.value())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_review(&self, review_id: &ReviewId) -> ReviewsResult<()> {
        sqlx::query("DELETE FROM reviews WHERE review_id = $1")
            .bind(review_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn list_reviews(
        &self,
        title_id: &TitleId,
        limit: i64,
        offset: i64,
    ) -> ReviewsResult<Vec<ReviewDetails>> {
        let rows = sqlx::query_as::<_, ReviewRow>(&format!(
            "{REVIEW_SELECT} WHERE r.title_id = $1 ORDER BY r.pub_date LIMIT $2 OFFSET $3"
        ))
        .bind(title_id.as_uuid())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ReviewRow::into_details).collect())
    }
}

// ============================================================================
// Comment Repository Implementation
// ============================================================================

const COMMENT_SELECT: &str = r#"
    SELECT
        cm.comment_id,
        cm.review_id,
        cm.author_id,
        cm.text,
        cm.pub_date,
        u.user_name AS author_name
    FROM comments cm
    JOIN users u ON u.user_id = cm.author_id
"#;

impl CommentRepository for PgCatalogRepository {
    async fn create_comment(&self, comment: &Comment) -> ReviewsResult<()> {
        sqlx::query(
            r#"
            INSERT INTO comments (comment_id, review_id, author_id, text, pub_date)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(comment.comment_id.as_uuid())
        .bind(comment.review_id.as_uuid())
        .bind(comment.author_id.as_uuid())
        .bind(&comment.text)
        .bind(comment.pub_date)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_comment(
        &self,
        review_id: &ReviewId,
        comment_id: &CommentId,
    ) -> ReviewsResult<Option<CommentDetails>> {
        let row = sqlx::query_as::<_, CommentRow>(&format!(
            "{COMMENT_SELECT} WHERE cm.review_id = $1 AND cm.comment_id = $2"
        ))
        .bind(review_id.as_uuid())
        .bind(comment_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(CommentRow::into_details))
    }

    async fn update_comment(&self, comment: &Comment) -> ReviewsResult<()> {
        sqlx::query("UPDATE comments SET text = $2 WHERE comment_id = $1")
            .bind(comment.comment_id.as_uuid())
            .bind(&comment.text)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_comment(&self, comment_id: &CommentId) -> ReviewsResult<()> {
        sqlx::query("DELETE FROM comments WHERE comment_id = $1")
            .bind(comment_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn list_comments(
        &self,
        review_id: &ReviewId,
        limit: i64,
        offset: i64,
    ) -> ReviewsResult<Vec<CommentDetails>> {
        let rows = sqlx::query_as::<_, CommentRow>(&format!(
            "{COMMENT_SELECT} WHERE cm.review_id = $1 ORDER BY cm.pub_date LIMIT $2 OFFSET $3"
        ))
        .bind(review_id.as_uuid())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CommentRow::into_details).collect())
    }
}

/// Map a unique-constraint violation to the conflict the pre-checks
/// would have produced, so check/write race losers see the same error.
fn translate_unique_violation(err: sqlx::Error) -> ReviewsError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23505") {
            match db_err.constraint() {
                Some("categories_slug_key") | Some("genres_slug_key") => {
                    return ReviewsError::SlugTaken;
                }
                Some("reviews_title_id_author_id_key") => {
                    return ReviewsError::DuplicateReview;
                }
                _ => {}
            }
        }
    }
    ReviewsError::from(err)
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct CategoryRow {
    category_id: Uuid,
    name: String,
    slug: String,
}

impl CategoryRow {
    fn into_category(self) -> Category {
        Category {
            category_id: CategoryId::from_uuid(self.category_id),
            name: self.name,
            slug: Slug::from_db(self.slug),
        }
    }
}

#[derive(sqlx::FromRow)]
struct GenreRow {
    genre_id: Uuid,
    name: String,
    slug: String,
}

impl GenreRow {
    fn into_genre(self) -> Genre {
        Genre {
            genre_id: GenreId::from_uuid(self.genre_id),
            name: self.name,
            slug: Slug::from_db(self.slug),
        }
    }
}

#[derive(sqlx::FromRow)]
struct TitleRow {
    title_id: Uuid,
    name: String,
    year: i32,
    description: Option<String>,
    category_id: Option<Uuid>,
    category_name: Option<String>,
    category_slug: Option<String>,
    rating: Option<f64>,
}

impl TitleRow {
    fn into_details(self, genres: Vec<Genre>) -> TitleDetails {
        let category = match (self.category_id, self.category_name, self.category_slug) {
            (Some(id), Some(name), Some(slug)) => Some(Category {
                category_id: CategoryId::from_uuid(id),
                name,
                slug: Slug::from_db(slug),
            }),
            _ => None,
        };

        TitleDetails {
            title: Title {
                title_id: TitleId::from_uuid(self.title_id),
                name: self.name,
                year: TitleYear::from_db(self.year),
                description: self.description,
                category_id: category.as_ref().map(|c| c.category_id),
            },
            category,
            genres,
            rating: self.rating,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ReviewRow {
    review_id: Uuid,
    title_id: Uuid,
    author_id: Uuid,
    text: String,
    score: i16,
    pub_date: DateTime<Utc>,
    author_name: String,
}

impl ReviewRow {
    fn into_details(self) -> ReviewDetails {
        ReviewDetails {
            review: Review {
                review_id: ReviewId::from_uuid(self.review_id),
                title_id: TitleId::from_uuid(self.title_id),
                author_id: UserId::from_uuid(self.author_id),
                text: self.text,
                score: Score::from_db(self.score),
                pub_date: self.pub_date,
            },
            author_name: self.author_name,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CommentRow {
    comment_id: Uuid,
    review_id: Uuid,
    author_id: Uuid,
    text: String,
    pub_date: DateTime<Utc>,
    author_name: String,
}

impl CommentRow {
    fn into_details(self) -> CommentDetails {
        CommentDetails {
            comment: Comment {
                comment_id: CommentId::from_uuid(self.comment_id),
                review_id: ReviewId::from_uuid(self.review_id),
                author_id: UserId::from_uuid(self.author_id),
                text: self.text,
                pub_date: self.pub_date,
            },
            author_name: self.author_name,
        }
    }
}
