//! Tests for request ID middleware

use super::super::*;
use axum::http::StatusCode;
use tower::ServiceExt;

#[tokio::test]
async fn test_request_id_is_generated() {
    let app = create_test_router(None).await;
    let response = app.oneshot(get_request("/noop")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let id = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap();
    let uuid = uuid::Uuid::parse_str(id).unwrap();
    assert_eq!(uuid.get_version_num(), 7);
}

#[tokio::test]
async fn test_incoming_request_id_is_kept() {
    let app = create_test_router(None).await;
    let request = Request::builder()
        .uri("/noop")
        .header("x-request-id", "from-the-edge-proxy")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "from-the-edge-proxy");
}

#[tokio::test]
async fn test_redirects_carry_request_id() {
    let app = create_app_router(None).await;
    let response = app.oneshot(get_request("/dashboard")).await.unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_request_id_can_be_excluded() {
    let config = create_base_config()
        .with_excluded_middlewares(vec![crate::HttpMiddleware::RequestId]);
    let app = create_test_router(Some(config)).await;
    let response = app.oneshot(get_request("/noop")).await.unwrap();
    assert!(!response.headers().contains_key("x-request-id"));
}
