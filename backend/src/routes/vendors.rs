//! Vendor routes - public listings, admin-managed

use super::extract::{JsonBody, PathId};
use crate::auth::AdminUser;
use crate::error::ApiResult;
use crate::services::VendorService;
use crate::state::AppState;
use afrofood_shared::models::{Vendor, VendorDetail};
use afrofood_shared::types::{CreateVendorRequest, UpdateVendorRequest};
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};

/// Create vendor routes
pub fn vendor_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_vendors).post(create_vendor))
        .route("/aggregate/:id", get(vendor_with_reviews))
        .route("/:id", get(get_vendor).put(update_vendor).delete(delete_vendor))
}

async fn list_vendors(State(state): State<AppState>) -> ApiResult<Json<Vec<Vendor>>> {
    Ok(Json(VendorService::list(state.repos()).await?))
}

/// GET /api/vendor/aggregate/:id - vendor with its reviews populated
async fn vendor_with_reviews(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> ApiResult<Json<VendorDetail>> {
    Ok(Json(VendorService::get_with_reviews(state.repos(), id).await?))
}

async fn get_vendor(State(state): State<AppState>, PathId(id): PathId) -> ApiResult<Json<Vendor>> {
    Ok(Json(VendorService::get(state.repos(), id).await?))
}

async fn create_vendor(
    State(state): State<AppState>,
    _admin: AdminUser,
    JsonBody(req): JsonBody<CreateVendorRequest>,
) -> ApiResult<Json<Vendor>> {
    let vendor = VendorService::create(state.repos(), state.passwords(), req).await?;
    Ok(Json(vendor))
}

async fn update_vendor(
    State(state): State<AppState>,
    _admin: AdminUser,
    PathId(id): PathId,
    JsonBody(req): JsonBody<UpdateVendorRequest>,
) -> ApiResult<Json<Vendor>> {
    let vendor = VendorService::update(state.repos(), state.passwords(), id, req).await?;
    Ok(Json(vendor))
}

async fn delete_vendor(
    State(state): State<AppState>,
    _admin: AdminUser,
    PathId(id): PathId,
) -> ApiResult<StatusCode> {
    VendorService::delete(state.repos(), id).await?;
    Ok(StatusCode::OK)
}
