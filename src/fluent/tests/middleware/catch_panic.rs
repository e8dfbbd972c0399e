//! Tests for panic catching middleware setup

use super::super::*;
use axum::http::StatusCode;
use tower::ServiceExt;

#[tokio::test]
async fn test_panicking_page_returns_500() {
    let app = create_app_router(None).await;
    let token = token_for("user-1", None);
    let response = app
        .oneshot(get_with_cookie("/dashboard/boom", &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/plain; charset=utf-8"
    );
    assert_eq!(get_body_string(response).await, "Internal Server Error");
}

#[tokio::test]
async fn test_gate_runs_before_the_panicking_handler() {
    let app = create_app_router(None).await;
    let response = app.oneshot(get_request("/dashboard/boom")).await.unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        location(&response),
        Some("/auth/signin?callbackUrl=/dashboard/boom")
    );
}

#[tokio::test]
async fn test_panic_is_forwarded_to_channel() {
    let (tx, mut rx) = tokio::sync::mpsc::channel(4);
    let app = FluentRouter::without_state(create_base_config())
        .unwrap()
        .with_panic_notification_channel(tx)
        .route(
            "/panic",
            get(|| async {
                panic!("settings page exploded");
                #[allow(unreachable_code)]
                "unreachable"
            }),
        )
        .setup_catch_panic()
        .into_inner();

    let response = app.oneshot(get_request("/panic")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let msg = rx.try_recv().unwrap();
    assert_eq!(msg, "Service panicked: settings page exploded");
}

#[tokio::test]
async fn test_excluded_catch_panic_leaves_normal_requests_alone() {
    let config = create_base_config()
        .with_excluded_middlewares(vec![crate::HttpMiddleware::CatchPanic]);
    let app = create_test_router(Some(config)).await;

    let response = app.oneshot(get_request("/noop")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(get_body_string(response).await, "OK\n");
}
