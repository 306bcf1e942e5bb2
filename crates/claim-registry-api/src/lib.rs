//! Claim Registry API Layer
//!
//! This crate provides the read-only REST API for the Claim Registry using
//! Axum. Every request is answered from the currently published snapshot;
//! handlers never wait on a sync.
//!
//! # Architecture
//!
//! - **Handlers**: claim list and lookup, health, index and version
//! - **Docs**: OpenAPI document and Redoc viewer
//! - **Routes**: Route definitions and router configuration
//! - **Middleware**: request IDs, tracing, CORS, compression, panic recovery
//! - **Error Handling**: Conversion of service errors to HTTP responses
//!
//! # Example
//!
//! ```rust,no_run
//! use claim_registry_api::build_api_server;
//! use claim_registry_service::ServiceRegistry;
//! use claim_registry_sync::SnapshotReader;
//!
//! # async fn example(reader: SnapshotReader) -> std::io::Result<()> {
//! let app = build_api_server(ServiceRegistry::new(reader));
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, app).await
//! # }
//! ```

pub mod docs;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod responses;
pub mod routes;

// Re-export main types for convenience
pub use error::{ApiError, ApiResult, ErrorResponse};
pub use handlers::{AppState, DEFAULT_OPENAPI_PATH, SERVICE_NAME};
pub use middleware::{CorsConfig, MiddlewareConfig, UuidRequestIdGenerator};
pub use responses::{ComponentHealth, HealthResponse, HealthStatus, ServiceInfo, VersionInfo};
pub use routes::build_router;

use axum::Router;
use claim_registry_service::ServiceRegistry;
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
};

/// Build a complete API server with middleware
///
/// This is a convenience function that builds a router with all middleware
/// configured using default settings.
pub fn build_api_server(services: ServiceRegistry) -> Router {
    build_api_server_with_state(AppState::new(services), MiddlewareConfig::default())
}

/// Build API server with custom middleware configuration
///
/// # Example
///
/// ```rust,no_run
/// use claim_registry_api::{build_api_server_with_config, MiddlewareConfig};
/// use claim_registry_service::ServiceRegistry;
///
/// # fn example(services: ServiceRegistry) {
/// let middleware_config = MiddlewareConfig::new().with_compression(false);
/// let app = build_api_server_with_config(services, middleware_config);
/// # }
/// ```
pub fn build_api_server_with_config(
    services: ServiceRegistry,
    middleware_config: MiddlewareConfig,
) -> Router {
    build_api_server_with_state(AppState::new(services), middleware_config)
}

/// Build API server from prepared state
///
/// Layers are applied innermost first; request IDs are assigned before
/// anything else runs so the trace span and every response carry one.
pub fn build_api_server_with_state(state: AppState, middleware_config: MiddlewareConfig) -> Router {
    let mut router = build_router(state).layer(CatchPanicLayer::custom(middleware::handle_panic));

    // Apply compression if enabled
    if middleware_config.enable_compression {
        router = router.layer(CompressionLayer::new());
    }

    router = router.layer(middleware_config.cors.into_layer());

    // Apply tracing if enabled
    if middleware_config.enable_tracing {
        router = router.layer(middleware::trace_layer());
    }

    router
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(UuidRequestIdGenerator))
}
