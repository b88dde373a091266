//! Route definitions for the AfroFood API
//!
//! This module organizes all API routes and applies middleware.

use crate::state::AppState;
use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

mod admin;
mod extract;
mod health;
mod meals;
mod orders;
mod reviews;
mod user;
mod vendors;

#[cfg(test)]
mod resource_tests;

pub use admin::admin_routes;
pub use extract::{parse_id, JsonBody, PathId};
pub use meals::meal_routes;
pub use orders::order_routes;
pub use reviews::review_routes;
pub use user::user_routes;
pub use vendors::vendor_routes;

/// Create the main application router with all middleware
pub fn create_router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config().server.request_timeout_secs);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        .route("/metrics", get(health::metrics))
        .nest("/api", api_routes(state.clone()))
        // Apply middleware layers
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(timeout))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API routes, one group per resource
fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/user", user_routes())
        .nest("/admin", admin_routes())
        .nest("/meals", meal_routes())
        .nest("/order", order_routes(state))
        .nest("/review", review_routes())
        .nest("/vendor", vendor_routes())
}
