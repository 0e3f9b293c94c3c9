//! Auth Routers

use axum::{
    Router,
    routing::{get, post},
};

use platform::mailer::{Mailer, TracingMailer};

use crate::application::config::AuthConfig;
use crate::domain::repository::UserRepository;
use crate::infra::postgres::PgUserRepository;
use crate::presentation::handlers::{self, AuthAppState};

/// Concrete state for the PostgreSQL wiring (routers + middleware)
pub type PgAuthAppState = AuthAppState<PgUserRepository, TracingMailer>;

/// Build the PostgreSQL state shared by the routers and the
/// authentication middleware
pub fn pg_state(repo: PgUserRepository, config: AuthConfig) -> PgAuthAppState {
    AuthAppState::new(repo, TracingMailer, config)
}

/// Create the Auth router with PostgreSQL repository
pub fn auth_router(state: PgAuthAppState) -> Router {
    auth_router_generic(state)
}

/// Create the Users router with PostgreSQL repository
pub fn users_router(state: PgAuthAppState) -> Router {
    users_router_generic(state)
}

/// Create a generic Auth router for any repository/mailer implementation
pub fn auth_router_generic<R, M>(state: AuthAppState<R, M>) -> Router
where
    R: UserRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    Router::new()
        .route("/signup", post(handlers::sign_up::<R, M>))
        .route("/token", post(handlers::obtain_token::<R, M>))
        .route("/refresh", post(handlers::refresh_token::<R, M>))
        .with_state(state)
}

/// Create a generic Users router for any repository/mailer implementation
pub fn users_router_generic<R, M>(state: AuthAppState<R, M>) -> Router
where
    R: UserRepository + Send + Sync + 'static,
    M: Send + Sync + 'static,
{
    Router::new()
        .route(
            "/",
            get(handlers::list_users::<R, M>).post(handlers::create_user::<R, M>),
        )
        .route(
            "/me",
            get(handlers::get_me::<R, M>).patch(handlers::patch_me::<R, M>),
        )
        .route(
            "/{username}",
            get(handlers::get_user::<R, M>)
                .patch(handlers::patch_user::<R, M>)
                .delete(handlers::delete_user::<R, M>),
        )
        .with_state(state)
}
