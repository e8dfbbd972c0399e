//! Tests for maximum payload size middleware

use super::super::*;
use axum::http::StatusCode;
use tower::ServiceExt;

#[tokio::test]
async fn test_body_within_limit() {
    let app = create_test_router(None).await;
    let response = app
        .oneshot(post_json("/noop", &"a".repeat(1000)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_declared_length_over_limit() {
    let app = create_test_router(None).await;
    let request = Request::builder()
        .method("POST")
        .uri("/noop")
        .header(header::CONTENT_LENGTH, "4096")
        .body(Body::from("a".repeat(4096)))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_limit_follows_config() {
    let config = create_base_config().with_max_payload_size_bytes(8 * 1024);
    let app = create_test_router(Some(config)).await;
    let request = Request::builder()
        .method("POST")
        .uri("/noop")
        .header(header::CONTENT_LENGTH, "4096")
        .body(Body::from("a".repeat(4096)))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
