//! Claim query service
//!
//! Read-only lookups against the currently published snapshot. Every call
//! takes one snapshot handle up front and answers entirely from it.

use async_trait::async_trait;
use claim_registry_core::{ClaimEntry, ClaimFilter, ClaimRegistry};
use claim_registry_sync::SnapshotReader;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::dto::{ClaimListResponse, RegistryStatus};
use crate::error::{ServiceError, ServiceResult};

/// Trait for claim queries
#[async_trait]
pub trait ClaimQueryService: Send + Sync {
    /// Current registry document
    async fn snapshot(&self) -> ServiceResult<Arc<ClaimRegistry>>;

    /// Claims matching every set criterion of `filter`
    async fn list_claims(&self, filter: &ClaimFilter) -> ServiceResult<ClaimListResponse>;

    /// First claim named `name`
    async fn get_claim(&self, name: &str) -> ServiceResult<ClaimEntry>;

    /// Summary of the published snapshot; never fails
    async fn status(&self) -> RegistryStatus;
}

/// Default implementation of ClaimQueryService
pub struct DefaultClaimQueryService {
    reader: SnapshotReader,
}

impl DefaultClaimQueryService {
    /// Create a query service reading from `reader`
    pub fn new(reader: SnapshotReader) -> Self {
        Self { reader }
    }
}

#[async_trait]
impl ClaimQueryService for DefaultClaimQueryService {
    async fn snapshot(&self) -> ServiceResult<Arc<ClaimRegistry>> {
        self.reader.read().ok_or(ServiceError::NotLoaded)
    }

    #[instrument(skip(self, filter))]
    async fn list_claims(&self, filter: &ClaimFilter) -> ServiceResult<ClaimListResponse> {
        let registry = self.snapshot().await?;
        let items = registry.filter(filter);

        debug!(matched = items.len(), total = registry.len(), "Listed claims");
        Ok(ClaimListResponse::new(items))
    }

    #[instrument(skip(self))]
    async fn get_claim(&self, name: &str) -> ServiceResult<ClaimEntry> {
        let registry = self.snapshot().await?;

        registry
            .find(name)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(name.to_string()))
    }

    async fn status(&self) -> RegistryStatus {
        match self.reader.snapshot() {
            Some(snapshot) => RegistryStatus {
                loaded: true,
                claims: snapshot.registry.len(),
                generation: snapshot.generation,
                last_synced: Some(snapshot.synced_at),
            },
            None => RegistryStatus {
                loaded: false,
                claims: 0,
                generation: 0,
                last_synced: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claim_registry_sync::SnapshotStore;
    use pretty_assertions::assert_eq;

    fn loaded_service() -> DefaultClaimQueryService {
        let store = SnapshotStore::new();
        store.replace(
            ClaimRegistry::new()
                .with_claim(
                    ClaimEntry::new("hacky")
                        .with_template("volumeclaim")
                        .with_category("cli")
                        .with_status("active")
                        .with_source("cli"),
                )
                .with_claim(
                    ClaimEntry::new("demo")
                        .with_template("harborproject")
                        .with_category("infra")
                        .with_status("inactive")
                        .with_source("api"),
                )
                .with_claim(
                    ClaimEntry::new("web")
                        .with_template("volumeclaim")
                        .with_category("infra")
                        .with_status("active")
                        .with_source("cli"),
                ),
        );
        DefaultClaimQueryService::new(store.reader())
    }

    fn names(list: &ClaimListResponse) -> Vec<&str> {
        list.items.iter().map(|entry| entry.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_not_loaded() {
        let service = DefaultClaimQueryService::new(SnapshotStore::new().reader());

        assert!(service.snapshot().await.unwrap_err().is_not_loaded());
        assert!(service
            .list_claims(&ClaimFilter::new())
            .await
            .unwrap_err()
            .is_not_loaded());
        assert!(service.get_claim("hacky").await.unwrap_err().is_not_loaded());

        let status = service.status().await;
        assert!(!status.loaded);
        assert_eq!(status.claims, 0);
    }

    #[tokio::test]
    async fn test_list_all_claims() {
        let service = loaded_service();
        let list = service.list_claims(&ClaimFilter::new()).await.unwrap();

        assert_eq!(list.kind, "ClaimList");
        assert_eq!(list.api_version, "claim-registry.io/v1alpha1");
        assert_eq!(names(&list), vec!["hacky", "demo", "web"]);
    }

    #[tokio::test]
    async fn test_list_with_filters() {
        let service = loaded_service();

        let list = service
            .list_claims(&ClaimFilter::new().with_category("infra"))
            .await
            .unwrap();
        assert_eq!(names(&list), vec!["demo", "web"]);

        let list = service
            .list_claims(&ClaimFilter::new().with_template("volumeclaim").with_status("active"))
            .await
            .unwrap();
        assert_eq!(names(&list), vec!["hacky", "web"]);

        let list = service
            .list_claims(&ClaimFilter::new().with_category("nonexistent"))
            .await
            .unwrap();
        assert!(list.is_empty());
    }

    #[tokio::test]
    async fn test_get_claim() {
        let service = loaded_service();

        let entry = service.get_claim("demo").await.unwrap();
        assert_eq!(entry.template, "harborproject");

        let err = service.get_claim("nonexistent").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_status_reflects_snapshot() {
        let service = loaded_service();
        let status = service.status().await;

        assert!(status.loaded);
        assert_eq!(status.claims, 3);
        assert_eq!(status.generation, 1);
        assert!(status.last_synced.is_some());
    }
}
