//! API documentation endpoints
//!
//! `/openapi.yaml` serves the document found on disk, or a minimal built-in
//! one when the file is missing. `/docs` renders it with Redoc.

use axum::{
    extract::State,
    http::header::CONTENT_TYPE,
    response::{Html, IntoResponse},
};
use tracing::{debug, warn};

use crate::handlers::AppState;

/// Served when no OpenAPI document exists on disk
pub const FALLBACK_OPENAPI: &str = "openapi: 3.0.3
info:
  title: Claim Registry API
  version: 0.0.0
paths: {}
";

const REDOC_PAGE: &str = r#"<!doctype html>
<html>
  <head>
    <meta charset="utf-8"/>
    <title>Claim Registry API Docs</title>
    <script src="https://cdn.jsdelivr.net/npm/redoc@next/bundles/redoc.standalone.js"></script>
  </head>
  <body>
    <redoc spec-url="/openapi.yaml"></redoc>
  </body>
</html>"#;

const YAML_CONTENT_TYPE: &str = "application/yaml";

/// Serve the OpenAPI document
pub async fn openapi_document(State(state): State<AppState>) -> impl IntoResponse {
    let body = match tokio::fs::read_to_string(&state.openapi_path).await {
        Ok(body) => body,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %state.openapi_path.display(), "OpenAPI document not found, serving fallback");
            FALLBACK_OPENAPI.to_string()
        }
        Err(e) => {
            warn!(path = %state.openapi_path.display(), error = %e, "Failed to read OpenAPI document");
            FALLBACK_OPENAPI.to_string()
        }
    };

    ([(CONTENT_TYPE, YAML_CONTENT_TYPE)], body)
}

/// Redoc viewer for the OpenAPI document
pub async fn redoc() -> Html<&'static str> {
    Html(REDOC_PAGE)
}
