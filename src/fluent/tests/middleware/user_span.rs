//! Tests for recording the caller into the request span

use super::super::*;
use axum::http::StatusCode;
use tower::ServiceExt;

#[tokio::test]
#[tracing_test::traced_test]
async fn test_caller_id_is_recorded() {
    let app = create_app_router(None).await;
    let token = token_for("user-1234", Some("Ada"));
    let response = app
        .oneshot(get_with_cookie("/dashboard", &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(logs_contain("user-1234"));
}

#[tokio::test]
#[tracing_test::traced_test]
async fn test_anonymous_redirect_is_logged() {
    let app = create_app_router(None).await;
    let response = app.oneshot(get_request("/settings")).await.unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert!(logs_contain("Redirecting gated request"));
    assert!(logs_contain("authenticated=false"));
}
