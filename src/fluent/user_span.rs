//! Middleware for recording the gated caller to the tracing span.

use {
    crate::CallerIdentity,
    axum::{body::Body, extract::Request, middleware::Next, response::Response},
};

/// Records the caller id to the current span's `user` field.
///
/// Runs inside the gate, which inserts the [`CallerIdentity`] into the
/// request extensions on allowed requests.
pub(crate) async fn record_user_to_span(request: Request<Body>, next: Next) -> Response {
    if let Some(user) = get_user_from_request(&request) {
        tracing::Span::current().record("user", user);
    }

    next.run(request).await
}

fn get_user_from_request(request: &Request<Body>) -> Option<&str> {
    request
        .extensions()
        .get::<CallerIdentity>()
        .map(|identity| identity.id.as_str())
}
