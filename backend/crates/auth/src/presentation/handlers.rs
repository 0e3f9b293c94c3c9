//! HTTP Handlers

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use std::sync::Arc;

use platform::mailer::Mailer;

use crate::application::config::AuthConfig;
use crate::application::{
    CreateUserInput, IssueTokenInput, IssueTokenUseCase, RefreshTokenUseCase, RegisterInput,
    RegisterUseCase, UserAdminService, UserPatch,
};
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    CreateUserRequest, ListUsersQuery, RefreshRequest, RefreshResponse, SignUpRequest,
    SignUpResponse, TokenRequest, TokenResponse, UserPatchRequest, UserResponse,
};
use crate::presentation::middleware::CurrentUser;

/// Default page size for list endpoints
const DEFAULT_PAGE_LIMIT: i64 = 20;

/// Hard cap on page size
const MAX_PAGE_LIMIT: i64 = 100;

/// Shared state for auth handlers
pub struct AuthAppState<R, M> {
    pub repo: Arc<R>,
    pub mailer: Arc<M>,
    pub config: Arc<AuthConfig>,
}

impl<R, M> AuthAppState<R, M> {
    pub fn new(repo: R, mailer: M, config: AuthConfig) -> Self {
        Self {
            repo: Arc::new(repo),
            mailer: Arc::new(mailer),
            config: Arc::new(config),
        }
    }
}

// Manual Clone: the derive would demand R: Clone and M: Clone
impl<R, M> Clone for AuthAppState<R, M> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            mailer: self.mailer.clone(),
            config: self.config.clone(),
        }
    }
}

fn require_admin(user: &CurrentUser) -> AuthResult<()> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(AuthError::PermissionDenied)
    }
}

fn page_bounds(limit: Option<i64>, offset: Option<i64>) -> (i64, i64) {
    let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT);
    let offset = offset.unwrap_or(0).max(0);
    (limit, offset)
}

// ============================================================================
// Registration / Token
// ============================================================================

/// POST /api/v1/auth/signup
pub async fn sign_up<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Json(req): Json<SignUpRequest>,
) -> AuthResult<Json<SignUpResponse>>
where
    R: UserRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let use_case = RegisterUseCase::new(
        state.repo.clone(),
        state.mailer.clone(),
        state.config.clone(),
    );

    let output = use_case
        .execute(RegisterInput {
            username: req.username,
            email: req.email,
        })
        .await?;

    Ok(Json(SignUpResponse {
        username: output.username,
        email: output.email,
    }))
}

/// POST /api/v1/auth/token
pub async fn obtain_token<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Json(req): Json<TokenRequest>,
) -> AuthResult<Json<TokenResponse>>
where
    R: UserRepository + Send + Sync + 'static,
    M: Send + Sync + 'static,
{
    let use_case = IssueTokenUseCase::new(state.repo.clone(), state.config.clone());

    let output = use_case
        .execute(IssueTokenInput {
            username: req.username,
            confirmation_code: req.confirmation_code,
        })
        .await?;

    Ok(Json(TokenResponse {
        access: output.access,
        refresh: output.refresh,
    }))
}

/// POST /api/v1/auth/refresh
pub async fn refresh_token<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Json(req): Json<RefreshRequest>,
) -> AuthResult<Json<RefreshResponse>>
where
    R: UserRepository + Send + Sync + 'static,
    M: Send + Sync + 'static,
{
    let use_case = RefreshTokenUseCase::new(state.repo.clone(), state.config.clone());
    let access = use_case.execute(req.refresh).await?;

    Ok(Json(RefreshResponse { access }))
}

// ============================================================================
// User management (admin)
// ============================================================================

/// GET /api/v1/users
pub async fn list_users<R, M>(
    State(state): State<AuthAppState<R, M>>,
    requester: CurrentUser,
    Query(query): Query<ListUsersQuery>,
) -> AuthResult<Json<Vec<UserResponse>>>
where
    R: UserRepository + Send + Sync + 'static,
    M: Send + Sync + 'static,
{
    require_admin(&requester)?;

    let (limit, offset) = page_bounds(query.limit, query.offset);
    let service = UserAdminService::new(state.repo.clone());
    let users = service.list(query.search.as_deref(), limit, offset).await?;

    Ok(Json(users.iter().map(UserResponse::from).collect()))
}

/// POST /api/v1/users
pub async fn create_user<R, M>(
    State(state): State<AuthAppState<R, M>>,
    requester: CurrentUser,
    Json(req): Json<CreateUserRequest>,
) -> AuthResult<(StatusCode, Json<UserResponse>)>
where
    R: UserRepository + Send + Sync + 'static,
    M: Send + Sync + 'static,
{
    require_admin(&requester)?;

    let service = UserAdminService::new(state.repo.clone());
    let user = service
        .create(CreateUserInput {
            username: req.username,
            email: req.email,
            role: req.role,
            first_name: req.first_name,
            last_name: req.last_name,
            bio: req.bio,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// GET /api/v1/users/{username}
pub async fn get_user<R, M>(
    State(state): State<AuthAppState<R, M>>,
    requester: CurrentUser,
    Path(username): Path<String>,
) -> AuthResult<Json<UserResponse>>
where
    R: UserRepository + Send + Sync + 'static,
    M: Send + Sync + 'static,
{
    require_admin(&requester)?;

    let service = UserAdminService::new(state.repo.clone());
    let user = service.get(&username).await?;

    Ok(Json(UserResponse::from(&user)))
}

/// PATCH /api/v1/users/{username}
pub async fn patch_user<R, M>(
    State(state): State<AuthAppState<R, M>>,
    requester: CurrentUser,
    Path(username): Path<String>,
    Json(req): Json<UserPatchRequest>,
) -> AuthResult<Json<UserResponse>>
where
    R: UserRepository + Send + Sync + 'static,
    M: Send + Sync + 'static,
{
    require_admin(&requester)?;

    let service = UserAdminService::new(state.repo.clone());
    let user = service.get(&username).await?;
    let user = service
        .update(user, patch_from(req), requester.role)
        .await?;

    Ok(Json(UserResponse::from(&user)))
}

/// DELETE /api/v1/users/{username}
pub async fn delete_user<R, M>(
    State(state): State<AuthAppState<R, M>>,
    requester: CurrentUser,
    Path(username): Path<String>,
) -> AuthResult<StatusCode>
where
    R: UserRepository + Send + Sync + 'static,
    M: Send + Sync + 'static,
{
    require_admin(&requester)?;

    let service = UserAdminService::new(state.repo.clone());
    service.delete(&username).await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Self profile
// ============================================================================

/// GET /api/v1/users/me
pub async fn get_me<R, M>(
    State(state): State<AuthAppState<R, M>>,
    requester: CurrentUser,
) -> AuthResult<Json<UserResponse>>
where
    R: UserRepository + Send + Sync + 'static,
    M: Send + Sync + 'static,
{
    let service = UserAdminService::new(state.repo.clone());
    let user = service.get_by_id(&requester.user_id).await?;

    Ok(Json(UserResponse::from(&user)))
}

/// PATCH /api/v1/users/me
///
/// Role changes from non-admin requesters are silently dropped, not
/// rejected (see the user-management service).
pub async fn patch_me<R, M>(
    State(state): State<AuthAppState<R, M>>,
    requester: CurrentUser,
    Json(req): Json<UserPatchRequest>,
) -> AuthResult<Json<UserResponse>>
where
    R: UserRepository + Send + Sync + 'static,
    M: Send + Sync + 'static,
{
    let service = UserAdminService::new(state.repo.clone());
    let user = service.get_by_id(&requester.user_id).await?;
    let user = service
        .update(user, patch_from(req), requester.role)
        .await?;

    Ok(Json(UserResponse::from(&user)))
}

fn patch_from(req: UserPatchRequest) -> UserPatch {
    UserPatch {
        email: req.email,
        first_name: req.first_name,
        last_name: req.last_name,
        bio: req.bio,
        role: req.role,
    }
}
