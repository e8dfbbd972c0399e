//! Tests for middleware selection

use super::super::*;
use crate::HttpMiddleware;
use axum::http::StatusCode;
use tower::ServiceExt;

#[tokio::test]
async fn test_gate_cannot_be_excluded() {
    let config = create_base_config().with_excluded_middlewares(vec![HttpMiddleware::Gate]);
    let Err(err) = FluentRouter::without_state(config) else {
        panic!("router built without the gate");
    };
    assert_eq!(err.kind(), crate::ErrorKind::Configuration);
}

#[tokio::test]
async fn test_include_list_without_gate_is_rejected() {
    let config = create_base_config()
        .with_included_middlewares(vec![HttpMiddleware::Logging, HttpMiddleware::Liveness]);
    assert!(FluentRouter::without_state(config).is_err());
}

#[tokio::test]
async fn test_user_span_requires_logging() {
    let config = create_base_config().with_excluded_middlewares(vec![HttpMiddleware::Logging]);
    let Err(err) = FluentRouter::without_state(config) else {
        panic!("user span enabled without logging");
    };
    assert!(err.to_string().contains("UserSpan requires Logging"));
}

#[tokio::test]
async fn test_minimal_include_list_still_gates() {
    let config = create_base_config().with_included_middlewares(vec![HttpMiddleware::Gate]);
    let app = create_app_router(Some(config)).await;

    let response = app.clone().oneshot(get_request("/dashboard")).await.unwrap();
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);

    // Liveness was not included.
    let response = app.oneshot(get_request("/live")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_middleware_list_from_toml() {
    let config: Config = r#"
[http]
exclude = ["timeout", "request-id"]

[auth]
secret = "test-secret-0123456789abcdef0123456789"
"#
    .parse()
    .unwrap();

    let app = create_test_router(Some(config)).await;
    let response = app.oneshot(get_request("/noop")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!response.headers().contains_key("x-request-id"));
}
