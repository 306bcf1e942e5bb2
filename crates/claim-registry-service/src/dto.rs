//! Data Transfer Objects (DTOs) for service layer
//!
//! Response shapes returned at the service boundary. Claim entries are
//! passed through unchanged from the snapshot.

use chrono::{DateTime, Utc};
use claim_registry_core::{ClaimEntry, CLAIM_LIST_KIND, DEFAULT_API_VERSION};
use serde::{Deserialize, Serialize};

/// List of claims matching a filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimListResponse {
    /// API version of the list document
    pub api_version: String,

    /// Always `ClaimList`
    pub kind: String,

    /// Matching entries in document order; empty when nothing matches
    pub items: Vec<ClaimEntry>,
}

impl ClaimListResponse {
    /// Wrap matching entries
    pub fn new(items: Vec<ClaimEntry>) -> Self {
        Self {
            api_version: DEFAULT_API_VERSION.to_string(),
            kind: CLAIM_LIST_KIND.to_string(),
            items,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Summary of the published snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryStatus {
    /// Whether a snapshot has been published
    pub loaded: bool,

    /// Number of claims in the snapshot
    pub claims: usize,

    /// Number of snapshots published so far
    pub generation: u64,

    /// When the current snapshot was published
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_synced: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_claim_list_serializes_empty_items() {
        let list = ClaimListResponse::new(Vec::new());
        let json = serde_json::to_value(&list).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "apiVersion": "claim-registry.io/v1alpha1",
                "kind": "ClaimList",
                "items": []
            })
        );
    }

    #[test]
    fn test_claim_list_items() {
        let list = ClaimListResponse::new(vec![ClaimEntry::new("hacky").with_category("cli")]);
        assert_eq!(list.len(), 1);

        let json = serde_json::to_value(&list).unwrap();
        assert_eq!(json["items"][0]["name"], "hacky");
        assert_eq!(json["items"][0]["category"], "cli");
    }

    #[test]
    fn test_registry_status_omits_missing_sync_time() {
        let status = RegistryStatus {
            loaded: false,
            claims: 0,
            generation: 0,
            last_synced: None,
        };
        let json = serde_json::to_value(&status).unwrap();
        assert!(json.get("last_synced").is_none());
        assert_eq!(json["loaded"], false);
    }
}
