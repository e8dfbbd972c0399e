//! Test helpers for FluentRouter tests.
//!
//! Everything here runs in-process through `oneshot()`. The real-server test
//! lives in `tests/gate_server.rs`.
//!
//! - Configuration: `create_base_config()`, `create_config_with_toml()`
//! - Routers: `create_test_router()`, `create_app_router()`
//! - Credentials: `token_for()`, `expired_token_for()`
//! - Requests: `get_request()`, `get_with_cookie()`, `get_with_bearer()`, `post_json()`
//! - Responses: `get_body_string()`, `location()`

use crate::{Config, FluentRouter, SessionIssuer};
use axum::{
    Router,
    body::Body,
    http::{Request, header},
    response::Response,
    routing::get,
};

pub(crate) mod middleware;

const BASE_CONFIG_TOML: &str = r#"
[http]
bind_addr = "127.0.0.1"
bind_port = 3000
max_payload_size_bytes = "1KiB"
trim_trailing_slash = true
liveness_route = "/live"

[auth]
secret = "test-secret-0123456789abcdef0123456789"

[logging]
format = "json"
"#;

/// Parses the base test configuration.
pub(crate) fn create_base_config() -> Config {
    BASE_CONFIG_TOML
        .parse()
        .expect("Failed to parse test config TOML")
}

/// Base configuration with `additional_toml` appended. Sections already in
/// the base (`[http]`, `[auth]`, `[logging]`) must not be repeated.
pub(crate) fn create_config_with_toml(additional_toml: &str) -> Config {
    format!("{BASE_CONFIG_TOML}\n{additional_toml}")
        .parse()
        .expect("Failed to parse test config TOML")
}

/// The full application: pages, mock integrations, a `/noop` and a
/// `/dashboard/boom` route, and the whole middleware stack.
pub(crate) async fn create_app_router(config: Option<Config>) -> Router {
    FluentRouter::without_state(config.unwrap_or_else(create_base_config))
        .expect("Failed to create FluentRouter")
        .setup_pages()
        .setup_mock_integrations()
        .merge(
            Router::new()
                .route("/noop", get(|| async { "OK\n" }).post(|| async { "OK\n" }))
                .route(
                    "/dashboard/boom",
                    get(|| async {
                        panic!("dashboard exploded");
                        #[allow(unreachable_code)]
                        "unreachable"
                    }),
                ),
        )
        .setup_middleware()
        .await
        .expect("Failed to setup middleware")
        .into_inner()
}

/// Only `/noop` behind the middleware stack.
pub(crate) async fn create_test_router(config: Option<Config>) -> Router {
    FluentRouter::without_state(config.unwrap_or_else(create_base_config))
        .expect("Failed to create FluentRouter")
        .merge(Router::new().route("/noop", get(|| async { "OK\n" }).post(|| async { "OK\n" })))
        .setup_middleware()
        .await
        .expect("Failed to setup middleware")
        .into_inner()
}

pub(crate) fn token_for(sub: &str, name: Option<&str>) -> String {
    SessionIssuer::new(&create_base_config().auth)
        .unwrap()
        .issue(sub, name.map(str::to_string), None)
        .unwrap()
}

pub(crate) fn expired_token_for(sub: &str) -> String {
    let issuer = SessionIssuer::new(&create_base_config().auth).unwrap();
    let mut claims = issuer.claims_for(sub, None, None);
    claims.iat -= 7200;
    claims.exp = claims.iat + 60;
    issuer.sign(&claims).unwrap()
}

pub(crate) fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub(crate) fn get_with_cookie(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::COOKIE, format!("session_token={token}"))
        .body(Body::empty())
        .unwrap()
}

pub(crate) fn get_with_bearer(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

pub(crate) fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub(crate) async fn get_body_string(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8_lossy(&body).to_string()
}

/// The `Location` header of a redirect, or `None`.
pub(crate) fn location(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}
