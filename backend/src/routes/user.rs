//! Customer account routes
//!
//! Register and login are public; everything else acts on the caller's
//! own account.

use super::extract::JsonBody;
use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::{AccountKind, AccountService};
use crate::state::AppState;
use afrofood_shared::models::UserProfile;
use afrofood_shared::types::{
    AccountResponse, ChangePasswordRequest, LoginRequest, RegisterRequest, UpdateProfileRequest,
};
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};

/// Create customer account routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/", get(profile).put(update_profile).delete(delete_account))
        .route("/changePassword", put(change_password))
}

/// POST /api/user/register
async fn register(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> ApiResult<Json<AccountResponse>> {
    let account = AccountService::register(&state, AccountKind::User, req).await?;
    Ok(Json(account))
}

/// POST /api/user/login
async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> ApiResult<Json<AccountResponse>> {
    let account = AccountService::login(&state, AccountKind::User, req).await?;
    Ok(Json(account))
}

/// GET /api/user
async fn profile(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<UserProfile>> {
    let profile = AccountService::get_profile(&state, auth.id()).await?;
    Ok(Json(profile))
}

/// PUT /api/user
async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(req): JsonBody<UpdateProfileRequest>,
) -> ApiResult<Json<AccountResponse>> {
    let account = AccountService::update_profile(&state, &auth, req).await?;
    Ok(Json(account))
}

/// PUT /api/user/changePassword
async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(req): JsonBody<ChangePasswordRequest>,
) -> ApiResult<Json<AccountResponse>> {
    let account = AccountService::change_password(&state, &auth, req).await?;
    Ok(Json(account))
}

/// DELETE /api/user - removes the account, its orders and its reviews
async fn delete_account(State(state): State<AppState>, auth: AuthUser) -> ApiResult<StatusCode> {
    AccountService::delete_account(&state, &auth).await?;
    Ok(StatusCode::OK)
}
