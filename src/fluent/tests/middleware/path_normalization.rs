//! Tests for trailing slash normalization
//!
//! Normalization is a `Router::layer`, so it runs after routing. What it
//! changes is the path the gate classifies and echoes into `callbackUrl`.

use super::super::*;
use axum::http::StatusCode;
use tower::ServiceExt;

#[tokio::test]
async fn test_gate_sees_trimmed_path() {
    let app = create_app_router(None).await;
    let response = app.oneshot(get_request("/settings/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        location(&response),
        Some("/auth/signin?callbackUrl=/settings")
    );
}

#[tokio::test]
async fn test_trim_disabled_keeps_slash_in_callback() {
    let config = create_base_config().with_trim_trailing_slash(false);
    let app = create_app_router(Some(config)).await;
    let response = app.oneshot(get_request("/settings/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        location(&response),
        Some("/auth/signin?callbackUrl=/settings/")
    );
}

#[tokio::test]
async fn test_trim_excluded_by_middleware_list() {
    let config = create_base_config()
        .with_excluded_middlewares(vec![crate::HttpMiddleware::PathNormalization]);
    let app = create_app_router(Some(config)).await;
    let response = app.oneshot(get_request("/dashboard/")).await.unwrap();

    assert_eq!(
        location(&response),
        Some("/auth/signin?callbackUrl=/dashboard/")
    );
}
