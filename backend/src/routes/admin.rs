//! Admin account routes
//!
//! Register and login are public (registration can be switched off in
//! configuration); every other route requires an admin principal.

use super::extract::{JsonBody, PathId};
use crate::auth::AdminUser;
use crate::error::ApiResult;
use crate::services::{AccountKind, AccountService, SeedService};
use crate::state::AppState;
use afrofood_shared::models::UserProfile;
use afrofood_shared::types::{
    AccountResponse, ChangePasswordRequest, LoginRequest, RegisterRequest, SeedSummary,
    UpdateProfileRequest,
};
use axum::{
    extract::State,
    routing::{get, post, put},
    Json, Router,
};

/// Create admin routes
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/", get(profile).put(update_profile))
        .route("/changePassword", put(change_password))
        .route("/users/:id", get(get_user))
        .route("/seed", post(seed))
}

/// POST /api/admin/register
async fn register(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> ApiResult<Json<AccountResponse>> {
    let account = AccountService::register(&state, AccountKind::Admin, req).await?;
    Ok(Json(account))
}

/// POST /api/admin/login
async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> ApiResult<Json<AccountResponse>> {
    let account = AccountService::login(&state, AccountKind::Admin, req).await?;
    Ok(Json(account))
}

/// GET /api/admin
async fn profile(State(state): State<AppState>, admin: AdminUser) -> ApiResult<Json<UserProfile>> {
    let profile = AccountService::get_profile(&state, admin.id()).await?;
    Ok(Json(profile))
}

/// PUT /api/admin
async fn update_profile(
    State(state): State<AppState>,
    admin: AdminUser,
    JsonBody(req): JsonBody<UpdateProfileRequest>,
) -> ApiResult<Json<AccountResponse>> {
    let account = AccountService::update_profile(&state, &admin, req).await?;
    Ok(Json(account))
}

/// PUT /api/admin/changePassword
async fn change_password(
    State(state): State<AppState>,
    admin: AdminUser,
    JsonBody(req): JsonBody<ChangePasswordRequest>,
) -> ApiResult<Json<AccountResponse>> {
    let account = AccountService::change_password(&state, &admin, req).await?;
    Ok(Json(account))
}

/// GET /api/admin/users/:id - any account's public profile
async fn get_user(
    State(state): State<AppState>,
    _admin: AdminUser,
    PathId(id): PathId,
) -> ApiResult<Json<UserProfile>> {
    let profile = AccountService::get_profile(&state, id).await?;
    Ok(Json(profile))
}

/// POST /api/admin/seed - insert the sample catalogue
async fn seed(State(state): State<AppState>, admin: AdminUser) -> ApiResult<Json<SeedSummary>> {
    let summary = SeedService::seed(state.repos(), state.passwords(), &admin).await?;
    Ok(Json(summary))
}
