//! Tests for sensitive header handling

use super::super::*;
use axum::http::StatusCode;
use tower::ServiceExt;

#[tokio::test]
#[tracing_test::traced_test]
async fn test_session_token_never_reaches_logs() {
    let app = create_app_router(None).await;
    let token = token_for("user-1", None);

    let response = app
        .clone()
        .oneshot(get_with_cookie("/auth/signin", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);

    let response = app
        .oneshot(get_with_bearer("/dashboard", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert!(!logs_contain(&token));
}

#[tokio::test]
async fn test_sensitive_headers_can_be_excluded() {
    let config = create_base_config()
        .with_excluded_middlewares(vec![crate::HttpMiddleware::SensitiveHeaders]);
    let app = create_test_router(Some(config)).await;
    let response = app.oneshot(get_request("/noop")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
