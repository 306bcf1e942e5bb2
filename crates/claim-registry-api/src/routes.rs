//! API route definitions
//!
//! This module defines all API routes and builds the router.

use axum::{routing::get, Router};

use crate::{
    docs::{openapi_document, redoc},
    handlers::{get_claim, health_check, list_claims, root_info, version_info, AppState},
};

/// Build the API router with all routes
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health and info endpoints
        .route("/", get(root_info))
        .route("/health", get(health_check))
        .route("/version", get(version_info))
        // Documentation
        .route("/openapi", get(openapi_document))
        .route("/openapi.yaml", get(openapi_document))
        .route("/docs", get(redoc))
        // API v1 routes
        .nest("/api/v1", build_v1_routes())
        .with_state(state)
}

/// Build v1 API routes
fn build_v1_routes() -> Router<AppState> {
    Router::new()
        .route("/claims", get(list_claims))
        .route("/claims/{name}", get(get_claim))
}
