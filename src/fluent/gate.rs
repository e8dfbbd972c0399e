//! Gate enforcement and user span recording.

use super::router::FluentRouter;
use super::user_span;

use {
    crate::{HttpMiddleware, gate::gate_middleware},
    std::sync::Arc,
};

impl<State> FluentRouter<State>
where
    State: Clone + Send + Sync + 'static,
{
    /// Installs the edge gate on every route registered so far and on the
    /// fallback.
    ///
    /// Requests selected by `gate.matchers` are classified and either
    /// redirected or forwarded with a [`CallerIdentity`](crate::CallerIdentity)
    /// in their extensions. Everything else passes through untouched.
    ///
    /// Routes added afterwards (the liveness probe, for instance) are not
    /// gated, so register pages before calling this.
    ///
    /// ```toml
    /// [gate]
    /// protected_roots = ["/dashboard", "/settings"]
    /// matchers = ["/", "/dashboard/:path*", "/settings/:path*", "/auth/:path*"]
    /// ```
    #[must_use]
    pub fn setup_gate(mut self) -> Self {
        if !self.is_middleware_enabled(HttpMiddleware::Gate) {
            // Rejected by config validation; unreachable for a validated config.
            tracing::error!("Gate middleware disabled, protected pages are exposed");
            return self;
        }

        let gate = Arc::clone(&self.gate);
        self.inner = self
            .inner
            .layer(axum::middleware::from_fn(move |request, next| {
                let gate = Arc::clone(&gate);
                gate_middleware(gate, request, next)
            }));
        self
    }

    /// Records the gated caller's id to the `user` field of the request span.
    ///
    /// Must sit inside the gate, which is what puts the identity into the
    /// request extensions. Requests without a caller leave the field empty.
    #[must_use]
    pub fn setup_user_span(mut self) -> Self {
        if !self.is_middleware_enabled(HttpMiddleware::UserSpan) {
            return self;
        }

        self.inner = self
            .inner
            .layer(axum::middleware::from_fn(user_span::record_user_to_span));
        self
    }
}
