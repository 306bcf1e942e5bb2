//! Test fixtures
//!
//! Registry documents served by the mock upstream.

/// Repository slug the test syncer points at
pub const TEST_REPOSITORY: &str = "stuttgart-things/harvester";

/// Raw-content path of the registry document for [`TEST_REPOSITORY`]
pub const TEST_DOCUMENT_PATH: &str = "/stuttgart-things/harvester/main/claims/registry.yaml";

/// Three claims across two categories and two sources
pub const TEST_REGISTRY_YAML: &str = r#"apiVersion: claim-registry.io/v1alpha1
kind: ClaimRegistry
claims:
  - name: app-db
    template: postgres-instance
    category: database
    namespace: team-a
    createdAt: "2024-05-01T10:00:00Z"
    createdBy: alice
    source: cli
    repository: stuttgart-things/harvester
    path: claims/database/app-db.yaml
    status: active
  - name: cache-01
    template: redis-instance
    category: cache
    namespace: team-a
    createdAt: "2024-05-02T08:30:00Z"
    createdBy: bob
    source: backstage
    repository: stuttgart-things/harvester
    path: claims/cache/cache-01.yaml
    status: active
  - name: legacy-db
    template: postgres-instance
    category: database
    namespace: team-b
    createdAt: "2023-11-20T16:45:00Z"
    createdBy: carol
    source: cli
    repository: stuttgart-things/harvester
    path: claims/database/legacy-db.yaml
    status: deleted
"#;

/// The same registry after `cache-01` was removed and `queue-01` added
pub const UPDATED_REGISTRY_YAML: &str = r#"apiVersion: claim-registry.io/v1alpha1
kind: ClaimRegistry
claims:
  - name: app-db
    template: postgres-instance
    category: database
    namespace: team-a
    source: cli
    status: active
  - name: queue-01
    template: nats-instance
    category: messaging
    namespace: team-c
    source: backstage
    status: active
"#;

/// A document whose `claims` key is explicitly null
pub const EMPTY_REGISTRY_YAML: &str = "apiVersion: claim-registry.io/v1alpha1\nkind: ClaimRegistry\nclaims: null\n";

/// Not YAML the registry parser accepts
pub const MALFORMED_REGISTRY_YAML: &str = "claims: [unterminated\n";
