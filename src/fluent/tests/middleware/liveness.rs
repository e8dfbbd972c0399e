//! Tests for the liveness probe

use super::super::*;
use axum::http::StatusCode;
use tower::ServiceExt;

#[tokio::test]
async fn test_liveness_answers_ok() {
    let app = create_test_router(None).await;
    let response = app.oneshot(get_request("/live")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(get_body_string(response).await, "OK\n");
}

#[tokio::test]
async fn test_custom_liveness_route() {
    let config = create_base_config().with_liveness_route("/healthz");
    let app = create_test_router(Some(config)).await;

    let response = app.clone().oneshot(get_request("/healthz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get_request("/live")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_liveness_can_be_excluded() {
    let config = create_base_config()
        .with_excluded_middlewares(vec![crate::HttpMiddleware::Liveness]);
    let app = create_test_router(Some(config)).await;

    let response = app.oneshot(get_request("/live")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
