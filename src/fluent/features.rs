//! Path normalization, request timeout and the liveness probe.

use super::router::FluentRouter;
use crate::HttpMiddleware;

use {axum::routing::get, http::StatusCode, tower_http::timeout::TimeoutLayer};

#[cfg(feature = "path-normalization")]
use tower_http::normalize_path::NormalizePathLayer;

impl<State> FluentRouter<State>
where
    State: Clone + Send + Sync + 'static,
{
    /// Removes a trailing slash from request paths before the gate sees them,
    /// so `/dashboard/` is gated exactly like `/dashboard`.
    ///
    /// This is a `Router::layer`, so it runs after routing: it changes the path
    /// the gate and handlers see, not which route matches. The page router
    /// registers `{root}/` next to `{root}` for that reason.
    ///
    /// ```toml
    /// [http]
    /// trim_trailing_slash = true  # Default
    /// ```
    #[cfg(feature = "path-normalization")]
    #[must_use]
    pub fn setup_path_normalization(mut self) -> Self {
        if !self.config.http.trim_trailing_slash
            || !self.is_middleware_enabled(HttpMiddleware::PathNormalization)
        {
            return self;
        }

        self.inner = self.inner.layer(NormalizePathLayer::trim_trailing_slash());
        self
    }

    /// No-op when `path-normalization` feature is disabled.
    #[cfg(not(feature = "path-normalization"))]
    #[must_use]
    pub fn setup_path_normalization(self) -> Self {
        self
    }

    /// Aborts requests that take longer than `http.request_timeout` with a
    /// `408 Request Timeout`. Nothing is installed when no timeout is set.
    #[must_use]
    pub fn setup_timeout(mut self) -> Self {
        if !self.is_middleware_enabled(HttpMiddleware::Timeout) {
            return self;
        }

        if let Some(timeout) = self.config.http.request_timeout {
            self.inner = self.inner.layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                timeout,
            ));
        }
        self
    }

    /// Adds the liveness probe at `http.liveness_route`.
    ///
    /// The probe is registered after the gate layer, so it answers without a
    /// session even when a matcher would otherwise cover it.
    #[must_use]
    pub fn setup_liveness(mut self) -> Self {
        if !self.is_middleware_enabled(HttpMiddleware::Liveness) {
            return self;
        }

        let liveness_route = self.config.http.liveness_route.clone();
        self.inner = self.inner.route(&liveness_route, get(|| async { "OK\n" }));
        self
    }
}
