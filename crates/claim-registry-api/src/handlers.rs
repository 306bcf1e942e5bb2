//! API request handlers
//!
//! This module implements HTTP request handlers for all API endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use claim_registry_core::{ClaimEntry, ClaimFilter};
use claim_registry_service::{ClaimListResponse, ServiceRegistry};
use claim_registry_sync::SyncMonitor;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::{
    error::{ApiError, ApiResult},
    responses::{ComponentHealth, HealthResponse, ServiceInfo, VersionInfo},
};

/// Name reported by the service index
pub const SERVICE_NAME: &str = "claim-registry-api";

/// Default location of the OpenAPI document on disk
pub const DEFAULT_OPENAPI_PATH: &str = "docs/openapi.yaml";

/// Routes listed by the service index
pub const ENDPOINTS: &[&str] = &[
    "/health",
    "/version",
    "/api/v1/claims",
    "/api/v1/claims/{name}",
    "/openapi.yaml",
    "/docs",
];

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Service registry
    pub services: Arc<ServiceRegistry>,

    /// Sync activity, reported by the health check when present
    pub monitor: Option<SyncMonitor>,

    /// OpenAPI document served at `/openapi.yaml`
    pub openapi_path: PathBuf,
}

impl AppState {
    /// Create new application state
    pub fn new(services: ServiceRegistry) -> Self {
        Self {
            services: Arc::new(services),
            monitor: None,
            openapi_path: PathBuf::from(DEFAULT_OPENAPI_PATH),
        }
    }

    /// Report sync activity in the health check
    pub fn with_monitor(mut self, monitor: SyncMonitor) -> Self {
        self.monitor = Some(monitor);
        self
    }

    /// Serve the OpenAPI document from `path`
    pub fn with_openapi_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.openapi_path = path.into();
        self
    }
}

// ============================================================================
// Claim Handlers
// ============================================================================

/// List claims, optionally filtered by `category`, `template`, `status` and `source`
#[instrument(skip(state))]
pub async fn list_claims(
    State(state): State<AppState>,
    Query(filter): Query<ClaimFilter>,
) -> ApiResult<Json<ClaimListResponse>> {
    debug!("Listing claims with filter: {:?}", filter);

    let response = state
        .services
        .claims()
        .list_claims(&filter)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(response))
}

/// Get a single claim by name
#[instrument(skip(state))]
pub async fn get_claim(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<ClaimEntry>> {
    debug!("Getting claim: {}", name);

    let entry = state
        .services
        .claims()
        .get_claim(&name)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(entry))
}

// ============================================================================
// Health & Info Handlers
// ============================================================================

/// Health check endpoint
///
/// Unhealthy (503) until the first snapshot is published. Degraded when the
/// most recent background sync failed and an older snapshot is served.
#[instrument(skip(state))]
pub async fn health_check(State(state): State<AppState>) -> HealthResponse {
    debug!("Health check requested");

    let registry = state.services.claims().status().await;
    let registry_health = if registry.loaded {
        let mut health = ComponentHealth::healthy()
            .with_metric("claims", registry.claims)
            .with_metric("generation", registry.generation);
        if let Some(last_synced) = registry.last_synced {
            health = health.with_metric("last_synced", last_synced.to_rfc3339());
        }
        health
    } else {
        ComponentHealth::unhealthy("registry not yet loaded")
    };

    let mut response = HealthResponse::healthy()
        .with_version(env!("CARGO_PKG_VERSION"))
        .with_check("registry", registry_health);

    if let Some(monitor) = &state.monitor {
        let sync = monitor.status();
        let sync_health = match &sync.last_error {
            Some(err) => ComponentHealth::degraded(format!("Last sync failed: {}", err)),
            None => ComponentHealth::healthy(),
        };
        response = response.with_check(
            "sync",
            sync_health
                .with_metric("state", sync.state.to_string())
                .with_metric("successful_cycles", sync.successful_cycles)
                .with_metric("failed_cycles", sync.failed_cycles),
        );
    }

    response.compute_status()
}

/// Service index
#[instrument]
pub async fn root_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: ENDPOINTS.iter().map(|e| e.to_string()).collect(),
    })
}

/// Get API version information
#[instrument]
pub async fn version_info() -> Json<VersionInfo> {
    Json(VersionInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        api_version: "v1".to_string(),
        commit: option_env!("GIT_COMMIT").unwrap_or("unknown").to_string(),
        build_timestamp: option_env!("BUILD_TIMESTAMP")
            .unwrap_or("unknown")
            .to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_version_info() {
        let Json(info) = version_info().await;
        assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(info.api_version, "v1");
    }

    #[tokio::test]
    async fn test_root_info_lists_endpoints() {
        let Json(info) = root_info().await;
        assert_eq!(info.service, "claim-registry-api");
        assert!(info.endpoints.iter().any(|e| e == "/api/v1/claims/{name}"));
    }
}
