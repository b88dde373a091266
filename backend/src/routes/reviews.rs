//! Review routes - public reads, authenticated writes

use super::extract::{JsonBody, PathId};
use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::ReviewService;
use crate::state::AppState;
use afrofood_shared::models::Review;
use afrofood_shared::types::{CreateReviewRequest, UpdateReviewRequest};
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};

/// Create review routes
pub fn review_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_reviews).post(create_review))
        .route("/aggregate/:id", get(reviews_by_user))
        .route("/:id", get(get_review).put(update_review).delete(delete_review))
}

async fn list_reviews(State(state): State<AppState>) -> ApiResult<Json<Vec<Review>>> {
    Ok(Json(ReviewService::list(state.repos()).await?))
}

/// GET /api/review/aggregate/:id - reviews written by one user
async fn reviews_by_user(
    State(state): State<AppState>,
    PathId(user_id): PathId,
) -> ApiResult<Json<Vec<Review>>> {
    Ok(Json(ReviewService::by_user(state.repos(), user_id).await?))
}

async fn get_review(State(state): State<AppState>, PathId(id): PathId) -> ApiResult<Json<Review>> {
    Ok(Json(ReviewService::get(state.repos(), id).await?))
}

async fn create_review(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(req): JsonBody<CreateReviewRequest>,
) -> ApiResult<Json<Review>> {
    Ok(Json(ReviewService::create(state.repos(), &auth, req).await?))
}

async fn update_review(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(id): PathId,
    JsonBody(req): JsonBody<UpdateReviewRequest>,
) -> ApiResult<Json<Review>> {
    Ok(Json(ReviewService::update(state.repos(), &auth, id, req).await?))
}

async fn delete_review(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(id): PathId,
) -> ApiResult<StatusCode> {
    ReviewService::delete(state.repos(), &auth, id).await?;
    Ok(StatusCode::OK)
}
