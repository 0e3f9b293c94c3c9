//! Catalog Router

use axum::{
    Router,
    routing::{delete, get},
};

use crate::infra::postgres::PgCatalogRepository;
use crate::presentation::handlers::{self, CatalogStore, ReviewsAppState};

/// Create the catalog router with PostgreSQL repository
pub fn catalog_router(repo: PgCatalogRepository) -> Router {
    catalog_router_generic(ReviewsAppState::new(repo))
}

/// Create a generic catalog router for any store implementation
pub fn catalog_router_generic<R: CatalogStore>(state: ReviewsAppState<R>) -> Router {
    Router::new()
        .route(
            "/categories",
            get(handlers::list_categories::<R>).post(handlers::create_category::<R>),
        )
        .route("/categories/{slug}", delete(handlers::delete_category::<R>))
        .route(
            "/genres",
            get(handlers::list_genres::<R>).post(handlers::create_genre::<R>),
        )
        .route("/genres/{slug}", delete(handlers::delete_genre::<R>))
        .route(
            "/titles",
            get(handlers::list_titles::<R>).post(handlers::create_title::<R>),
        )
        .route(
            "/titles/{title_id}",
            get(handlers::get_title::<R>)
                .patch(handlers::patch_title::<R>)
                .delete(handlers::delete_title::<R>),
        )
        .route(
            "/titles/{title_id}/reviews",
            get(handlers::list_reviews::<R>).post(handlers::create_review::<R>),
        )
        .route(
            "/titles/{title_id}/reviews/{review_id}",
            get(handlers::get_review::<R>)
                .patch(handlers::patch_review::<R>)
                .delete(handlers::delete_review::<R>),
        )
        .route(
            "/titles/{title_id}/reviews/{review_id}/comments",
            get(handlers::list_comments::<R>).post(handlers::create_comment::<R>),
        )
        .route(
            "/titles/{title_id}/reviews/{review_id}/comments/{comment_id}",
            get(handlers::get_comment::<R>)
                .patch(handlers::patch_comment::<R>)
                .delete(handlers::delete_comment::<R>),
        )
        .with_state(state)
}
