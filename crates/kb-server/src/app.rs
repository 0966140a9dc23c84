//! Router construction.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Create the application router.
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health::get_health))
        .route("/api/navigation", get(handlers::navigation::get_navigation))
        .route("/api/content/{*path}", get(handlers::content::get_content))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use kb_index::{CacheMode, IndexOptions, KnowledgeBase};
    use kb_source::MockSource;
    use pretty_assertions::assert_eq;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;

    fn router() -> Router {
        let source = MockSource::new()
            .with_file("01_go/01_basics/questions.md", "# Basics\n\n## Types")
            .with_file(
                "01_go/01_basics/questions_with_answers.md",
                "# Basics\n\nQuestion: a\n\nAnswer: b",
            )
            .with_file("01_go/02_maps/questions.md", "# Maps");
        let kb = KnowledgeBase::new(Arc::new(source), IndexOptions::default(), CacheMode::Static);
        create_router(Arc::new(AppState {
            kb: Arc::new(kb),
            version: "test".to_owned(),
        }))
    }

    async fn send(router: Router, uri: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_navigation() {
        let (status, json) = send(router(), "/api/navigation").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["generation"], 1);
        assert_eq!(json["root"]["children"][0]["slug"], "go");
        assert_eq!(json["root"]["children"][0]["children"][1]["slug"], "maps");
    }

    #[tokio::test]
    async fn test_content_default_variant() {
        let (status, json) = send(router(), "/api/content/go/basics").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["variant"], "questionsAndAnswers");
        assert_eq!(json["node"]["path"], serde_json::json!(["go", "basics"]));
        assert_eq!(json["next"]["slug"], "maps");
    }

    #[tokio::test]
    async fn test_content_requested_variant() {
        let (status, json) = send(router(), "/api/content/go/basics?variant=q").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["variant"], "questionsOnly");
        assert_eq!(json["headings"], serde_json::json!(["Types"]));
    }

    #[tokio::test]
    async fn test_content_not_found() {
        let (status, json) = send(router(), "/api/content/go/missing").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["path"], "go/missing");
    }

    #[tokio::test]
    async fn test_content_category_lists_children() {
        let (status, json) = send(router(), "/api/content/go").await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["children"], serde_json::json!(["go/basics", "go/maps"]));
    }

    #[tokio::test]
    async fn test_content_variant_unavailable() {
        let (status, json) = send(router(), "/api/content/go/maps?variant=qa").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["fallback"], "questionsOnly");
    }

    #[tokio::test]
    async fn test_content_unknown_variant() {
        let (status, _) = send(router(), "/api/content/go/maps?variant=solutions").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_content_etag_not_modified() {
        let router = router();
        let first = router
            .clone()
            .oneshot(Request::get("/api/content/go/maps").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let etag = first.headers()[header::ETAG].clone();

        let second = router
            .oneshot(
                Request::get("/api/content/go/maps")
                    .header(header::IF_NONE_MATCH, etag)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(second.status(), StatusCode::NOT_MODIFIED);
    }

    #[tokio::test]
    async fn test_health() {
        let (status, json) = send(router(), "/api/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert_eq!(json["generation"], 0);
    }
}
