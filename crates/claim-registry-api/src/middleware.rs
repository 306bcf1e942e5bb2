//! API middleware
//!
//! This module provides middleware layers for request processing including
//! logging, CORS, compression, panic recovery and request ID generation.

use axum::{
    http::{header, HeaderName, HeaderValue, Method, Request, StatusCode},
    response::{IntoResponse, Response},
};
use std::any::Any;
use tower_http::{
    cors::{Any as AnyOrigin, CorsLayer},
    request_id::{MakeRequestId, RequestId},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
    LatencyUnit,
};
use tracing::{error, Level};
use uuid::Uuid;

use crate::error::ApiError;

/// Request ID header name
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request ID generator using UUIDs
///
/// Only consulted when the client did not send an `x-request-id` header.
#[derive(Clone, Default)]
pub struct UuidRequestIdGenerator;

impl MakeRequestId for UuidRequestIdGenerator {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let request_id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&request_id).ok().map(RequestId::new)
    }
}

/// Build trace layer
pub fn trace_layer() -> TraceLayer<tower_http::classify::SharedClassifier<tower_http::classify::ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
        .make_span_with(
            DefaultMakeSpan::new()
                .include_headers(true)
                .level(Level::INFO),
        )
        .on_response(
            DefaultOnResponse::new()
                .include_headers(true)
                .latency_unit(LatencyUnit::Millis)
                .level(Level::INFO),
        )
}

/// Build CORS layer with the default configuration
pub fn cors_layer() -> CorsLayer {
    CorsConfig::default().into_layer()
}

/// Render a handler panic as a JSON 500
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    error!(panic = %detail, "Request handler panicked");

    ApiError::with_code(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal server error",
        "INTERNAL_ERROR",
    )
    .into_response()
}

/// CORS configuration options
#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Allowed origins (empty means any)
    pub allowed_origins: Vec<String>,

    /// Max age for preflight cache
    pub max_age_seconds: Option<u64>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![],
            max_age_seconds: Some(3600),
        }
    }
}

impl CorsConfig {
    /// Restrict to the given origins
    pub fn with_origins(mut self, origins: Vec<String>) -> Self {
        self.allowed_origins = origins;
        self
    }

    /// Build CORS layer from config
    ///
    /// The API is read-only, so only GET and OPTIONS are allowed.
    pub fn into_layer(self) -> CorsLayer {
        let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

        let mut layer = CorsLayer::new()
            .allow_methods([Method::GET, Method::OPTIONS])
            .allow_headers([
                header::CONTENT_TYPE,
                header::AUTHORIZATION,
                request_id.clone(),
            ])
            .expose_headers([request_id]);

        // Configure origins
        if self.allowed_origins.is_empty() {
            layer = layer.allow_origin(AnyOrigin);
        } else {
            let origins: Vec<HeaderValue> = self
                .allowed_origins
                .iter()
                .filter_map(|o| o.parse().ok())
                .collect();
            layer = layer.allow_origin(origins);
        }

        if let Some(max_age) = self.max_age_seconds {
            layer = layer.max_age(std::time::Duration::from_secs(max_age));
        }

        layer
    }
}

/// Middleware configuration
#[derive(Debug, Clone)]
pub struct MiddlewareConfig {
    /// CORS configuration
    pub cors: CorsConfig,

    /// Enable compression
    pub enable_compression: bool,

    /// Enable request tracing
    pub enable_tracing: bool,
}

impl Default for MiddlewareConfig {
    fn default() -> Self {
        Self {
            cors: CorsConfig::default(),
            enable_compression: true,
            enable_tracing: true,
        }
    }
}

impl MiddlewareConfig {
    /// Create a new middleware config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set CORS config
    pub fn with_cors(mut self, cors: CorsConfig) -> Self {
        self.cors = cors;
        self
    }

    /// Enable/disable compression
    pub fn with_compression(mut self, enable: bool) -> Self {
        self.enable_compression = enable;
        self
    }

    /// Enable/disable tracing
    pub fn with_tracing(mut self, enable: bool) -> Self {
        self.enable_tracing = enable;
        self
    }
}
