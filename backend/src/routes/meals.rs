//! Meal routes - public menu, admin-managed

use super::extract::{JsonBody, PathId};
use crate::auth::AdminUser;
use crate::error::ApiResult;
use crate::services::MealService;
use crate::state::AppState;
use afrofood_shared::models::Meal;
use afrofood_shared::types::{CreateMealRequest, MealCategoryQuery, UpdateMealRequest};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

/// Create meal routes
pub fn meal_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_meals).post(create_meal))
        .route("/aggregate", get(meals_by_category))
        .route("/:id", get(get_meal).put(update_meal).delete(delete_meal))
}

/// GET /api/meals
async fn list_meals(State(state): State<AppState>) -> ApiResult<Json<Vec<Meal>>> {
    Ok(Json(MealService::list(state.repos()).await?))
}

/// GET /api/meals/aggregate?category=
async fn meals_by_category(
    State(state): State<AppState>,
    Query(query): Query<MealCategoryQuery>,
) -> ApiResult<Json<Vec<Meal>>> {
    let meals = MealService::by_category(state.repos(), query.category.as_deref()).await?;
    Ok(Json(meals))
}

/// GET /api/meals/:id
async fn get_meal(State(state): State<AppState>, PathId(id): PathId) -> ApiResult<Json<Meal>> {
    Ok(Json(MealService::get(state.repos(), id).await?))
}

/// POST /api/meals
async fn create_meal(
    State(state): State<AppState>,
    _admin: AdminUser,
    JsonBody(req): JsonBody<CreateMealRequest>,
) -> ApiResult<Json<Meal>> {
    Ok(Json(MealService::create(state.repos(), req).await?))
}

/// PUT /api/meals/:id
async fn update_meal(
    State(state): State<AppState>,
    _admin: AdminUser,
    PathId(id): PathId,
    JsonBody(req): JsonBody<UpdateMealRequest>,
) -> ApiResult<Json<Meal>> {
    Ok(Json(MealService::update(state.repos(), id, req).await?))
}

/// DELETE /api/meals/:id
async fn delete_meal(
    State(state): State<AppState>,
    _admin: AdminUser,
    PathId(id): PathId,
) -> ApiResult<StatusCode> {
    MealService::delete(state.repos(), id).await?;
    Ok(StatusCode::OK)
}
