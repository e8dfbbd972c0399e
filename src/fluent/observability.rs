//! Request logging.

use super::router::FluentRouter;
use crate::HttpMiddleware;

use {axum::body::Body, http::Request, tower_http::trace::TraceLayer as TowerHTTPLayer};

impl<State> FluentRouter<State>
where
    State: Clone + Send + Sync + 'static,
{
    /// Sets up HTTP request/response logging middleware.
    ///
    /// Every request gets an `http_request` span carrying the method, the URI,
    /// the `x-request-id` and an initially empty `user` field. The user span
    /// middleware fills in `user` once the gate has resolved a caller.
    ///
    /// Output format follows `logging.format`. Credential headers are never
    /// printed as long as sensitive header handling stays enabled.
    #[must_use]
    pub fn setup_logging(mut self) -> Self {
        if !self.is_middleware_enabled(HttpMiddleware::Logging) {
            return self;
        }

        self.inner = self.inner.layer(TowerHTTPLayer::new_for_http().make_span_with(
            |request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("unknown");

                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri().path(),
                    request_id = %request_id,
                    user = tracing::field::Empty,
                )
            },
        ));

        self
    }
}
