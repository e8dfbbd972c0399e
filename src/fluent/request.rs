//! Request handling middleware: payload limits, request ID, sensitive headers.

use super::router::FluentRouter;
use crate::HttpMiddleware;

use {
    crate::utils::RequestIdGenerator,
    http::HeaderName,
    tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
};

#[cfg(feature = "payload-limit")]
use {axum::extract::DefaultBodyLimit, tower_http::limit::RequestBodyLimitLayer};

#[cfg(feature = "sensitive-headers")]
use {
    http::header::{AUTHORIZATION, COOKIE, SET_COOKIE},
    tower_http::sensitive_headers::SetSensitiveHeadersLayer,
};

impl<State> FluentRouter<State>
where
    State: Clone + Send + Sync + 'static,
{
    /// Sets up maximum request payload size limits.
    ///
    /// Rejects requests with bodies larger than the configured limit with
    /// a `413 Payload Too Large` response.
    ///
    /// ```toml
    /// [http]
    /// max_payload_size_bytes = "64KiB"
    /// ```
    #[cfg(feature = "payload-limit")]
    #[must_use]
    pub fn setup_max_payload_size(mut self) -> Self {
        if !self.is_middleware_enabled(HttpMiddleware::MaxPayloadSize) {
            return self;
        }

        self.inner = self
            .inner
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(
                self.config.http.max_payload_size_bytes.as_u64() as usize,
            ));
        self
    }

    /// No-op when `payload-limit` feature is disabled.
    #[cfg(not(feature = "payload-limit"))]
    #[must_use]
    pub fn setup_max_payload_size(self) -> Self {
        self
    }

    /// Sets up request ID generation and propagation.
    ///
    /// Generates a UUIDv7 `x-request-id` when the request has none, and copies
    /// it onto the response. The logging span picks it up, so every gate
    /// decision can be correlated with the request that caused it.
    #[must_use]
    pub fn setup_request_id(mut self) -> Self {
        if !self.is_middleware_enabled(HttpMiddleware::RequestId) {
            return self;
        }

        // The last layer added runs first: the id must be set before it is
        // propagated.
        let x_request_id = HeaderName::from_static("x-request-id");
        self.inner = self
            .inner
            .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
            .layer(SetRequestIdLayer::new(x_request_id, RequestIdGenerator));
        self
    }

    /// Marks credential-bearing headers as sensitive so the logging layer never
    /// prints them.
    ///
    /// Session tokens travel in `Cookie` or `Authorization` and are re-issued
    /// in `Set-Cookie`.
    #[cfg(feature = "sensitive-headers")]
    #[must_use]
    pub fn setup_sensitive_headers(mut self) -> Self {
        if !self.is_middleware_enabled(HttpMiddleware::SensitiveHeaders) {
            return self;
        }

        self.inner = self.inner.layer(SetSensitiveHeadersLayer::new([
            AUTHORIZATION,
            COOKIE,
            SET_COOKIE,
        ]));
        self
    }

    /// No-op when `sensitive-headers` feature is disabled.
    #[cfg(not(feature = "sensitive-headers"))]
    #[must_use]
    pub fn setup_sensitive_headers(self) -> Self {
        self
    }
}
