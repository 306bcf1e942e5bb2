//! Common test utilities and helpers
//!
//! Every [`TestApp`] runs the full stack: a wiremock upstream standing in
//! for the raw-content host, a syncer polling it and the HTTP API served
//! on a random local port.

#![allow(dead_code)]

use claim_registry_api::{build_api_server_with_state, AppState, MiddlewareConfig};
use claim_registry_service::ServiceRegistry;
use claim_registry_sync::{SyncConfig, Syncer};
use std::future::Future;
use std::time::Duration;
use tokio::net::TcpListener;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub mod fixtures;

use fixtures::{TEST_DOCUMENT_PATH, TEST_REGISTRY_YAML, TEST_REPOSITORY};

/// Poll interval used by test syncers
pub const TEST_SYNC_INTERVAL: Duration = Duration::from_millis(100);

/// Test application state
pub struct TestApp {
    pub address: String,
    pub upstream: MockServer,
    pub syncer: Syncer,
}

impl TestApp {
    /// Start the stack over [`TEST_REGISTRY_YAML`]
    pub async fn new() -> Self {
        Self::with_document(TEST_REGISTRY_YAML).await
    }

    /// Start the stack over the given upstream document
    pub async fn with_document(document: &str) -> Self {
        let upstream = MockServer::start().await;
        serve_document(&upstream, document).await;

        let config = SyncConfig::new(TEST_REPOSITORY)
            .with_base_url(upstream.uri())
            .with_interval(TEST_SYNC_INTERVAL)
            .with_request_timeout(Duration::from_secs(2));

        let mut syncer = Syncer::new(config).expect("Failed to create syncer");
        syncer.initial_sync().await.expect("Initial sync failed");
        syncer.start().expect("Failed to start syncer");

        let state = AppState::new(ServiceRegistry::new(syncer.reader()))
            .with_monitor(syncer.monitor())
            .with_openapi_path(claim_registry_api::DEFAULT_OPENAPI_PATH);
        let app = build_api_server_with_state(state, MiddlewareConfig::default());

        // Start server on random port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let address = listener.local_addr().expect("Failed to get local address");

        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Failed to start test server");
        });

        Self {
            address: format!("http://{}", address),
            upstream,
            syncer,
        }
    }

    /// Get base URL
    pub fn url(&self) -> &str {
        &self.address
    }

    /// Create HTTP client
    pub fn client(&self) -> reqwest::Client {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .expect("Failed to build client")
    }

    /// GET a path relative to the base URL
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client()
            .get(format!("{}{}", self.url(), path))
            .send()
            .await
            .expect("Failed to send request")
    }

    /// Replace whatever the upstream currently serves
    pub async fn set_upstream(&self, template: ResponseTemplate) {
        self.upstream.reset().await;
        Mock::given(method("GET"))
            .and(path(TEST_DOCUMENT_PATH))
            .respond_with(template)
            .mount(&self.upstream)
            .await;
    }
}

/// Serve `document` at the registry path
pub async fn serve_document(upstream: &MockServer, document: &str) {
    Mock::given(method("GET"))
        .and(path(TEST_DOCUMENT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(document))
        .mount(upstream)
        .await;
}

/// Poll `check` until it returns true or `timeout` elapses
pub async fn eventually<F, Fut>(timeout: Duration, mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if check().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    false
}

/// Assert that response has a specific status code
pub fn assert_status(response: &reqwest::Response, expected: reqwest::StatusCode) {
    assert_eq!(
        response.status(),
        expected,
        "Expected status {}, got {}",
        expected,
        response.status()
    );
}

/// Assert that response is successful (2xx)
pub fn assert_success(response: &reqwest::Response) {
    assert!(
        response.status().is_success(),
        "Expected success status, got {}",
        response.status()
    );
}
