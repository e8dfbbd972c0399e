//! Orchestration and router delegation: setup_middleware(), start(), layer(), route(), etc.

use super::router::FluentRouter;
use super::shutdown::{ShutdownNotifier, ShutdownPhase};
use crate::Result;

use {
    axum::{Router, body::Body, routing::Route},
    http::Request,
    std::{convert::Infallible, net::SocketAddr, time::Duration},
    tokio::net::TcpListener,
    tokio::signal,
    tower::{Layer, Service},
};

impl<State> FluentRouter<State>
where
    State: Clone + Send + Sync + 'static,
{
    /// Sets up the gate and all supporting middleware in the correct order.
    ///
    /// Register pages and other routes **before** calling this: layers wrap
    /// only the routes (and the fallback) that exist when they are added.
    ///
    /// # Middleware Order
    ///
    /// The last layer added is the outermost and runs first on a request.
    /// From innermost to outermost:
    ///
    /// 1. **User span** - record the gated caller id to the request span
    /// 2. **Gate** - resolve, classify, redirect or forward with the identity
    /// 3. **Max payload size** - limit body size
    /// 4. **Path normalization** - trim trailing slashes before the gate
    /// 5. **Sensitive headers** - hide `Authorization` and `Cookie` from logs
    /// 6. **Logging** - one `http_request` span per request
    /// 7. **Timeout** - optional request deadline
    /// 8. **Request ID** - generate or keep `x-request-id`
    /// 9. **Liveness** - `/live`, added after the gate and never gated
    /// 10. **Panic catching** - outermost
    ///
    /// ```rust,no_run
    /// # use dashgate::{Config, FluentRouter, Result};
    /// # async fn example() -> Result<()> {
    /// // Manual setup, innermost first
    /// let router = FluentRouter::without_state(Config::default())?
    ///     .setup_pages()
    ///     .setup_user_span()
    ///     .setup_gate()
    ///     .setup_logging()
    ///     .setup_request_id()
    ///     .setup_liveness()
    ///     .setup_catch_panic();
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the configuration no longer validates.
    pub async fn setup_middleware(self) -> Result<Self> {
        const PACKAGE_NAME: &str = env!("CARGO_PKG_NAME");
        const VERSION: &str = env!("CARGO_PKG_VERSION");
        tracing::info!("Starting {PACKAGE_NAME} version {VERSION}...");

        self.config.validate()?;

        let router = self
            .setup_user_span() // 1. Record caller to span (needs the gate's identity)
            .setup_gate() // 2. Gate
            .setup_max_payload_size() // 3. Body size limits
            .setup_path_normalization() // 4. Path normalization
            .setup_sensitive_headers() // 5. Filter sensitive headers
            .setup_logging() // 6. Request/response logging
            .setup_timeout() // 7. Request timeout (optional)
            .setup_request_id() // 8. Request ID - early so all requests get IDs
            .setup_liveness() // 9. Liveness endpoint (not gated)
            .setup_catch_panic(); // 10. Outermost - panic recovery

        Ok(router)
    }

    /// Starts the HTTP server based on the current configuration.
    ///
    /// The server supports both HTTP/1.1 and HTTP/2 protocols automatically.
    /// HTTP/2 will be used when clients request it via ALPN negotiation.
    ///
    /// # Graceful Shutdown
    ///
    /// When a shutdown signal is received (SIGTERM or SIGINT), the server:
    ///
    /// 1. Emits [`ShutdownPhase::Initiated`] to all subscribers
    /// 2. Triggers the cancellation token (stopping background tasks)
    /// 3. Stops accepting new connections
    /// 4. Emits [`ShutdownPhase::GracePeriodStarted`] with the configured timeout
    /// 5. Waits for in-flight requests to complete (up to `shutdown_timeout`)
    /// 6. Emits [`ShutdownPhase::GracePeriodEnded`] if timeout expires
    /// 7. Exits
    ///
    /// If all connections drain before the timeout, shutdown completes early
    /// without waiting for the full timeout duration.
    ///
    /// Components can subscribe to these phases before calling `start()`:
    ///
    /// ```rust,no_run
    /// use dashgate::{Config, FluentRouter, ShutdownPhase};
    ///
    /// # async fn example() -> dashgate::Result<()> {
    /// let router = FluentRouter::without_state(Config::default())?;
    ///
    /// // Set up shutdown handlers BEFORE starting
    /// let mut shutdown_rx = router.subscribe_to_shutdown();
    ///
    /// tokio::spawn(async move {
    ///     while let Ok(phase) = shutdown_rx.recv().await {
    ///         tracing::info!("Shutdown phase: {:?}", phase);
    ///     }
    /// });
    ///
    /// // Now start the server
    /// router.setup_middleware().await?.start().await
    /// # }
    /// ```
    pub async fn start(self) -> Result<()> {
        let bind_addr = self.config.http.full_bind_addr();
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Bound to {}", &bind_addr);
        self.serve(listener).await
    }

    /// Like [`start`](FluentRouter::start), on a listener bound by the caller.
    /// Binding port 0 and reading `listener.local_addr()` first is how tests
    /// find the server.
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        tracing::info!(
            matchers = ?self.gate.matchers().patterns(),
            "Waiting for connections"
        );

        let service = self
            .inner
            .with_state(self.state)
            .into_make_service_with_connect_info::<SocketAddr>();

        let shutdown_timeout = self.config.http.shutdown_timeout;
        let shutdown_notifier = self.shutdown_notifier.clone();

        let mut shutdown_rx = shutdown_notifier.subscribe();

        let serve_future = axum::serve(listener, service).with_graceful_shutdown(
            shutdown_signal_with_notifications(shutdown_timeout, shutdown_notifier.clone()),
        );

        // The grace period starts when the signal arrives, not now.
        tokio::select! {
            result = serve_future => {
                tracing::info!("Graceful shutdown completed");
                result?;
            }
            _ = async {
                loop {
                    match shutdown_rx.recv().await {
                        Ok(ShutdownPhase::Initiated) => break,
                        Ok(_) => continue,
                        Err(_) => std::future::pending::<()>().await,
                    }
                }
                tokio::time::sleep(shutdown_timeout).await;
            } => {
                tracing::warn!("Graceful shutdown timeout expired, forcing shutdown");
                shutdown_notifier.emit(ShutdownPhase::GracePeriodEnded);
            }
        }

        Ok(())
    }

    /// Adds a custom Tower layer around every route registered so far.
    ///
    /// ```rust,no_run
    /// use tower_http::catch_panic::CatchPanicLayer;
    /// # use dashgate::{Config, FluentRouter};
    /// # fn example() -> dashgate::Result<()> {
    /// let router = FluentRouter::without_state(Config::default())?
    ///     .setup_pages()
    ///     .layer(CatchPanicLayer::new());
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn layer<L>(mut self, layer: L) -> Self
    where
        L: Layer<Route> + Clone + Send + Sync + 'static,
        L::Service: Service<Request<Body>> + Clone + Send + Sync + 'static,
        <L::Service as Service<Request<Body>>>::Response: axum::response::IntoResponse + 'static,
        <L::Service as Service<Request<Body>>>::Error: Into<Infallible> + 'static,
        <L::Service as Service<Request<Body>>>::Future: Send + 'static,
    {
        self.inner = self.inner.layer(layer);
        self
    }

    /// Adds a route. It is gated only when added before
    /// [`setup_gate`](FluentRouter::setup_gate) and selected by a matcher.
    ///
    /// ```
    /// use dashgate::{Config, FluentRouter};
    /// use axum::routing::get;
    ///
    /// let router = FluentRouter::without_state(Config::default().with_secret("s3cr3t"))
    ///     .unwrap()
    ///     .route("/dashboard/reports", get(|| async { "reports" }))
    ///     .into_inner();
    /// ```
    #[must_use]
    pub fn route(mut self, path: &str, route: axum::routing::MethodRouter<State>) -> Self {
        self.inner = self.inner.route(path, route);
        self
    }

    /// Nests another router at a path prefix.
    #[must_use]
    pub fn nest(mut self, path: &str, router: Router<State>) -> Self {
        self.inner = self.inner.nest(path, router);
        self
    }

    /// Merges another router into this one without prefixing its routes.
    #[must_use]
    pub fn merge(mut self, other: Router<State>) -> Self {
        self.inner = self.inner.merge(other);
        self
    }

    /// Consumes the `FluentRouter` and returns the underlying `axum::Router`.
    pub fn into_inner(self) -> Router<State> {
        self.inner
    }
}

/// Resolves on SIGTERM or SIGINT after emitting [`ShutdownPhase::Initiated`]
/// and [`ShutdownPhase::GracePeriodStarted`]. The grace period itself is
/// enforced by [`FluentRouter::serve`].
///
/// If a handler cannot be installed, waits forever instead of shutting down.
pub(crate) async fn shutdown_signal_with_notifications(
    timeout: Duration,
    notifier: ShutdownNotifier,
) {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {
                tracing::debug!("Ctrl+C signal received");
            }
            Err(err) => {
                tracing::warn!("Failed to install Ctrl+C handler: {}", err);
                // Wait indefinitely if we can't install the handler
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal_handler) => {
                signal_handler.recv().await;
                tracing::debug!("SIGTERM signal received");
            }
            Err(err) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", err);
                // Wait indefinitely if we can't install the handler
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!(
        "Shutdown signal received, starting graceful shutdown (timeout: {}s)",
        timeout.as_secs()
    );
    let subscriber_count = notifier.emit(ShutdownPhase::Initiated);
    tracing::debug!(
        "Shutdown initiated notification sent to {} subscriber(s)",
        subscriber_count
    );

    notifier.emit(ShutdownPhase::GracePeriodStarted { timeout });
}
