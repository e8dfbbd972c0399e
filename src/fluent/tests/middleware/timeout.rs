//! Tests for request timeout middleware

use super::super::*;
use axum::http::StatusCode;
use std::time::Duration;
use tower::ServiceExt;

async fn slow_router(config: Config) -> Router {
    FluentRouter::without_state(config)
        .unwrap()
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_millis(500)).await;
                "done"
            }),
        )
        .setup_middleware()
        .await
        .unwrap()
        .into_inner()
}

#[tokio::test]
async fn test_slow_request_times_out() {
    let config = create_base_config().with_request_timeout(Duration::from_millis(50));
    let app = slow_router(config).await;

    let response = app.oneshot(get_request("/slow")).await.unwrap();
    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
}

#[tokio::test]
async fn test_no_timeout_configured() {
    let app = slow_router(create_base_config()).await;

    let response = app.oneshot(get_request("/slow")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(get_body_string(response).await, "done");
}

#[tokio::test]
async fn test_timeout_can_be_excluded() {
    let config = create_base_config()
        .with_request_timeout(Duration::from_millis(50))
        .with_excluded_middlewares(vec![crate::HttpMiddleware::Timeout]);
    let app = slow_router(config).await;

    let response = app.oneshot(get_request("/slow")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
