//! Order routes
//!
//! The whole group sits behind the authentication layer; ownership is
//! checked per order by the service.

use super::extract::{JsonBody, PathId};
use crate::auth::{require, AdminUser, AnyAccount, AuthUser};
use crate::error::ApiResult;
use crate::services::OrderService;
use crate::state::AppState;
use afrofood_shared::models::Order;
use afrofood_shared::types::{CreateOrderRequest, UpdateOrderRequest};
use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::get,
    Json, Router,
};

/// Create order routes
pub fn order_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route("/aggregate/:id", get(orders_by_user))
        .route("/:id", get(get_order).put(update_order).delete(delete_order))
        .route_layer(middleware::from_fn_with_state(state, require::<AnyAccount>))
}

/// GET /api/order - every order (admin only)
async fn list_orders(State(state): State<AppState>, _admin: AdminUser) -> ApiResult<Json<Vec<Order>>> {
    Ok(Json(OrderService::list_all(state.repos()).await?))
}

/// GET /api/order/aggregate/:id - orders placed by one user
async fn orders_by_user(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(user_id): PathId,
) -> ApiResult<Json<Vec<Order>>> {
    let orders = OrderService::list_for_user(state.repos(), &auth, user_id).await?;
    Ok(Json(orders))
}

/// GET /api/order/:id
async fn get_order(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(id): PathId,
) -> ApiResult<Json<Order>> {
    Ok(Json(OrderService::get(state.repos(), &auth, id).await?))
}

/// POST /api/order
async fn create_order(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(req): JsonBody<CreateOrderRequest>,
) -> ApiResult<Json<Order>> {
    Ok(Json(OrderService::create(state.repos(), &auth, req).await?))
}

/// PUT /api/order/:id
async fn update_order(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(id): PathId,
    JsonBody(req): JsonBody<UpdateOrderRequest>,
) -> ApiResult<Json<Order>> {
    Ok(Json(OrderService::update(state.repos(), &auth, id, req).await?))
}

/// DELETE /api/order/:id
async fn delete_order(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(id): PathId,
) -> ApiResult<StatusCode> {
    OrderService::delete(state.repos(), &auth, id).await?;
    Ok(StatusCode::OK)
}
