//! Axum router configuration for the upload server.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::ServerState;

/// Create the application router.
pub fn create_router(state: Arc<ServerState>) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health_check))
        .route("/upload", post(handlers::upload).layer(body_limit))
        .route("/downloads/:id/filtered_urls.txt", get(handlers::download))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::ArtifactStore;
    use crate::config::HlxConfig;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn app(root: &std::path::Path) -> Router {
        let state = ServerState::new(HlxConfig::default(), ArtifactStore::new(root));
        create_router(Arc::new(state))
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let root = tempfile::tempdir().unwrap();
        let response = app(root.path())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "OK");
    }

    #[tokio::test]
    async fn index_renders_form() {
        let root = tempfile::tempdir().unwrap();
        let response = app(root.path())
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("name=\"harFile\""));
    }

    #[tokio::test]
    async fn download_rejects_bad_token() {
        let root = tempfile::tempdir().unwrap();
        let response = app(root.path())
            .oneshot(
                Request::builder()
                    .uri("/downloads/not-a-token/filtered_urls.txt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn download_unknown_token_not_found() {
        let root = tempfile::tempdir().unwrap();
        let uri = crate::server::download_path(crate::artifact::ArtifactId::new());
        let response = app(root.path())
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
