//! API Integration Tests
//!
//! Tests for the HTTP REST API over a registry synced from a mock upstream:
//! listing and filtering claims, single-claim lookup, health, index and docs.

mod common;

use claim_registry_core::ClaimEntry;
use common::fixtures::EMPTY_REGISTRY_YAML;
use common::{assert_status, assert_success, TestApp};
use reqwest::StatusCode;

fn item_names(body: &serde_json::Value) -> Vec<String> {
    body["items"]
        .as_array()
        .expect("items should be an array")
        .iter()
        .map(|item| item["name"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[tokio::test]
async fn test_list_claims_returns_all_in_document_order() {
    let app = TestApp::new().await;

    let response = app.get("/api/v1/claims").await;
    assert_success(&response);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["apiVersion"], "claim-registry.io/v1alpha1");
    assert_eq!(body["kind"], "ClaimList");
    assert_eq!(item_names(&body), vec!["app-db", "cache-01", "legacy-db"]);
}

#[tokio::test]
async fn test_list_claims_single_filter() {
    let app = TestApp::new().await;

    let response = app.get("/api/v1/claims?category=database").await;
    assert_success(&response);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(item_names(&body), vec!["app-db", "legacy-db"]);
}

#[tokio::test]
async fn test_list_claims_filters_combine_with_and() {
    let app = TestApp::new().await;

    let response = app
        .get("/api/v1/claims?category=database&status=active&source=cli")
        .await;
    assert_success(&response);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(item_names(&body), vec!["app-db"]);
}

#[tokio::test]
async fn test_list_claims_no_match_is_empty_array() {
    let app = TestApp::new().await;

    let response = app.get("/api/v1/claims?template=mysql-instance").await;
    assert_success(&response);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["items"], serde_json::json!([]));
}

#[tokio::test]
async fn test_list_claims_filter_is_case_sensitive() {
    let app = TestApp::new().await;

    let response = app.get("/api/v1/claims?category=Database").await;
    assert_success(&response);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert!(item_names(&body).is_empty());
}

#[tokio::test]
async fn test_list_claims_empty_param_matches_everything() {
    let app = TestApp::new().await;

    let response = app.get("/api/v1/claims?status=&source=backstage").await;
    assert_success(&response);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(item_names(&body), vec!["cache-01"]);
}

#[tokio::test]
async fn test_get_claim() {
    let app = TestApp::new().await;

    let response = app.get("/api/v1/claims/cache-01").await;
    assert_success(&response);

    let entry: ClaimEntry = response.json().await.expect("Failed to parse JSON");
    assert_eq!(entry.name, "cache-01");
    assert_eq!(entry.template, "redis-instance");
    assert_eq!(entry.created_at, "2024-05-02T08:30:00Z");
    assert_eq!(entry.created_by, "bob");
    assert_eq!(entry.path, "claims/cache/cache-01.yaml");
}

#[tokio::test]
async fn test_get_claim_uses_camel_case_fields() {
    let app = TestApp::new().await;

    let body: serde_json::Value = app
        .get("/api/v1/claims/app-db")
        .await
        .json()
        .await
        .expect("Failed to parse JSON");

    assert_eq!(body["createdAt"], "2024-05-01T10:00:00Z");
    assert_eq!(body["createdBy"], "alice");
    assert!(body.get("created_at").is_none());
}

#[tokio::test]
async fn test_get_unknown_claim_is_not_found() {
    let app = TestApp::new().await;

    let response = app.get("/api/v1/claims/does-not-exist").await;
    assert_status(&response, StatusCode::NOT_FOUND);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], 404);
    assert_eq!(body["error"], "claim not found");
}

#[tokio::test]
async fn test_empty_registry() {
    let app = TestApp::with_document(EMPTY_REGISTRY_YAML).await;

    let response = app.get("/api/v1/claims").await;
    assert_success(&response);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["items"], serde_json::json!([]));

    let response = app.get("/api/v1/claims/app-db").await;
    assert_status(&response, StatusCode::NOT_FOUND);

    // An empty document is still a loaded document
    let response = app.get("/health").await;
    assert_success(&response);
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = TestApp::new().await;

    let response = app.get("/health").await;
    assert_success(&response);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "healthy");
    assert!(body["version"].is_string());
    assert_eq!(body["checks"]["registry"]["metrics"]["claims"], 3);
}

#[tokio::test]
async fn test_root_and_version_endpoints() {
    let app = TestApp::new().await;

    let response = app.get("/").await;
    assert_success(&response);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["service"], "claim-registry-api");
    assert!(body["endpoints"].is_array());

    let response = app.get("/version").await;
    assert_success(&response);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert!(body["version"].is_string());
    assert_eq!(body["api_version"], "v1");
}

#[tokio::test]
async fn test_openapi_document() {
    let app = TestApp::new().await;

    let response = app.get("/openapi.yaml").await;
    assert_success(&response);
    assert_eq!(
        response.headers()["content-type"],
        "application/yaml"
    );

    let text = response.text().await.expect("Failed to get response text");
    assert!(text.contains("/api/v1/claims"));
}

#[tokio::test]
async fn test_docs_page() {
    let app = TestApp::new().await;

    let response = app.get("/docs").await;
    assert_success(&response);

    let text = response.text().await.expect("Failed to get response text");
    assert!(text.contains("/openapi.yaml"));
}

#[tokio::test]
async fn test_not_found_endpoint() {
    let app = TestApp::new().await;

    let response = app.get("/nonexistent").await;
    assert_status(&response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_write_methods_not_allowed() {
    let app = TestApp::new().await;

    let response = app
        .client()
        .post(format!("{}/api/v1/claims", app.url()))
        .send()
        .await
        .expect("Failed to send request");

    assert_status(&response, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_request_id_header() {
    let app = TestApp::new().await;

    let response = app.get("/health").await;
    assert!(response.headers().contains_key("x-request-id"));

    let response = app
        .client()
        .get(format!("{}/api/v1/claims", app.url()))
        .header("x-request-id", "trace-me-42")
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.headers()["x-request-id"], "trace-me-42");
}

#[tokio::test]
async fn test_cors_headers() {
    let app = TestApp::new().await;

    let response = app
        .client()
        .request(reqwest::Method::OPTIONS, format!("{}/api/v1/claims", app.url()))
        .header("Origin", "http://example.com")
        .header("Access-Control-Request-Method", "GET")
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.headers().contains_key("access-control-allow-origin"));
}
