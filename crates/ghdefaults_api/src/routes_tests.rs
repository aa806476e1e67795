//! Tests for routes module

use super::*;
use crate::test_support::{body_text, state_for};
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use tower::ServiceExt;

// Nothing listens here; these routes never reach GitHub.
const UNUSED_API_URL: &str = "http://127.0.0.1:9";

fn router() -> Router {
    create_router(state_for(UNUSED_API_URL), Duration::from_secs(5))
}

#[tokio::test]
async fn test_ready_returns_ok() {
    let request = Request::builder()
        .uri("/-/ready")
        .body(Body::empty())
        .unwrap();

    let response = router().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn test_webhook_requires_post() {
    let request = Request::builder()
        .uri("/webhook")
        .body(Body::empty())
        .unwrap();

    let response = router().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let request = Request::builder()
        .uri("/api/v1/health")
        .body(Body::empty())
        .unwrap();

    let response = router().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let request = Request::builder()
        .method("POST")
        .uri("/webhook")
        .header("x-github-event", "ping")
        .body(Body::from(vec![b'a'; MAX_BODY_BYTES + 1]))
        .unwrap();

    let response = router().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
