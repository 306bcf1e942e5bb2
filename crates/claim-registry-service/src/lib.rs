//! Service layer for the Claim Registry
//!
//! This crate sits between the API layer and the snapshot store. It answers
//! read-only queries from whichever registry document is currently
//! published and maps "not loaded yet" and "no such claim" to service
//! errors the API renders.
//!
//! # Example
//!
//! ```rust,no_run
//! use claim_registry_core::ClaimFilter;
//! use claim_registry_service::ServiceRegistry;
//! use claim_registry_sync::SnapshotReader;
//!
//! # async fn example(reader: SnapshotReader) {
//! let services = ServiceRegistry::new(reader);
//! let infra = services
//!     .claims()
//!     .list_claims(&ClaimFilter::new().with_category("infra"))
//!     .await;
//! # }
//! ```

pub mod dto;
pub mod error;
pub mod query;

// Re-export main types for convenience
pub use dto::*;
pub use error::{ServiceError, ServiceResult};
pub use query::{ClaimQueryService, DefaultClaimQueryService};

use claim_registry_sync::SnapshotReader;
use std::sync::Arc;

/// Service registry that holds all service instances
#[derive(Clone)]
pub struct ServiceRegistry {
    /// Claim query service
    pub claims: Arc<dyn ClaimQueryService>,
}

impl ServiceRegistry {
    /// Create a service registry reading from `reader`
    pub fn new(reader: SnapshotReader) -> Self {
        Self {
            claims: Arc::new(DefaultClaimQueryService::new(reader)),
        }
    }

    /// Create a service registry with custom implementations
    pub fn with_services(claims: Arc<dyn ClaimQueryService>) -> Self {
        Self { claims }
    }

    /// Get the claim query service
    pub fn claims(&self) -> &Arc<dyn ClaimQueryService> {
        &self.claims
    }
}
