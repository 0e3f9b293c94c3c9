//! Auth Middleware
//!
//! Bearer-token authentication. The middleware resolves a valid access
//! token to a [`CurrentUser`] stored in request extensions; handlers
//! pull it out with the [`CurrentUser`] extractor (401 when absent).
//! Requests without credentials pass through anonymously so public
//! read endpoints keep working.

use axum::body::Body;
use axum::extract::{FromRequestParts, State};
use axum::http::{HeaderMap, Request, header, request::Parts};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use platform::token::TokenKind;
use uuid::Uuid;

use crate::domain::repository::UserRepository;
use crate::domain::value_object::{UserId, UserRole};
use crate::error::AuthError;
use crate::presentation::handlers::AuthAppState;

/// Authenticated requester identity, resolved fresh per request so role
/// changes take effect immediately.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: UserId,
    pub user_name: String,
    pub role: UserRole,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn is_moderator(&self) -> bool {
        self.role.is_moderator()
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AuthError::Unauthorized)
    }
}

/// Middleware that resolves a Bearer access token to a [`CurrentUser`].
///
/// A missing Authorization header is anonymous access; a present but
/// invalid token is rejected outright.
pub async fn authenticate<R, M>(
    State(state): State<AuthAppState<R, M>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    R: UserRepository + Send + Sync + 'static,
    M: Send + Sync + 'static,
{
    let Some(token) = bearer_token(req.headers()) else {
        return Ok(next.run(req).await);
    };

    let subject = state
        .config
        .tokens()
        .verify(&token, TokenKind::Access)
        .map_err(|_| AuthError::InvalidToken.into_response())?;

    let user_id: UserId = Uuid::parse_str(&subject)
        .map(Into::into)
        .map_err(|_| AuthError::InvalidToken.into_response())?;

    let user = state
        .repo
        .find_by_id(&user_id)
        .await
        .map_err(|e| e.into_response())?
        .filter(|u| u.is_activated())
        .ok_or_else(|| AuthError::InvalidToken.into_response())?;

    req.extensions_mut().insert(CurrentUser {
        user_id: user.user_id,
        user_name: user.user_name.original().to_string(),
        role: user.role,
    });

    Ok(next.run(req).await)
}

/// [`authenticate`] instantiated for the PostgreSQL state, handy for
/// `axum::middleware::from_fn_with_state`
pub async fn authenticate_pg(
    state: State<crate::presentation::router::PgAuthAppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    authenticate(state, req, next).await
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}
