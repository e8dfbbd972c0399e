//! Core FluentRouter struct and initialization methods.

use tokio_util::sync::CancellationToken;

use {
    super::shutdown::ShutdownNotifier,
    crate::{Config, Gate, HttpMiddleware, Result},
    axum::Router,
    std::sync::Arc,
    tokio::sync::broadcast,
};

/// Router builder that installs the gate and the supporting middleware from
/// a [`Config`].
///
/// # Example
///
/// ```rust,no_run
/// use dashgate::{Config, FluentRouter};
///
/// # async fn example() -> dashgate::Result<()> {
/// let config = Config::from_rust_env()?;
/// config.setup_tracing();
///
/// FluentRouter::without_state(config)?
///     .setup_pages()
///     .setup_mock_integrations()
///     .setup_middleware()
///     .await?
///     .start()
///     .await
/// # }
/// ```
pub struct FluentRouter<State = ()> {
    pub(crate) config: Config,
    pub(crate) state: State,
    pub(crate) inner: Router<State>,
    pub(crate) gate: Arc<Gate>,
    pub(crate) panic_channel: Option<tokio::sync::mpsc::Sender<String>>,
    pub(crate) shutdown_notifier: ShutdownNotifier,
}

impl FluentRouter {
    /// Creates a new `FluentRouter` without application state.
    pub fn without_state(config: Config) -> Result<FluentRouter<()>> {
        FluentRouter::<()>::with_state(config, ())
    }
}

impl<State> FluentRouter<State>
where
    State: Clone + Send + Sync + 'static,
{
    /// Creates a new `FluentRouter` with the provided configuration.
    ///
    /// The configuration is validated and the [`Gate`] is built here, so a
    /// missing secret or an inconsistent `[gate]` section fails before any
    /// route is registered.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if validation fails or the gate cannot be
    /// built.
    pub fn with_state<S: Clone + Send + Sync + 'static>(
        config: Config,
        state: S,
    ) -> Result<FluentRouter<S>> {
        config.validate()?;
        let gate = Arc::new(Gate::new(&config)?);

        Ok(FluentRouter {
            config,
            state,
            inner: Router::new(),
            gate,
            panic_channel: None,
            shutdown_notifier: ShutdownNotifier::default(),
        })
    }

    /// The gate shared by the middleware and the page handlers.
    pub fn gate(&self) -> Arc<Gate> {
        Arc::clone(&self.gate)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the shutdown notifier for subscribing to shutdown phases.
    pub fn shutdown_notifier(&self) -> &ShutdownNotifier {
        &self.shutdown_notifier
    }

    /// Token cancelled as soon as a shutdown signal is received.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.shutdown_notifier.cancellation_token()
    }

    pub fn subscribe_to_shutdown(&self) -> broadcast::Receiver<super::shutdown::ShutdownPhase> {
        self.shutdown_notifier.subscribe()
    }

    /// Returns true if no middleware list is configured (all enabled by
    /// default), or if the middleware is included / not excluded.
    pub(crate) fn is_middleware_enabled(&self, middleware: HttpMiddleware) -> bool {
        self.config
            .http
            .middleware
            .as_ref()
            .map(|config| config.is_enabled(middleware))
            .unwrap_or(true)
    }

    /// Sets a channel receiving a message for every panic caught by the
    /// catch-panic middleware.
    #[must_use]
    pub fn with_panic_notification_channel(self, ch: tokio::sync::mpsc::Sender<String>) -> Self {
        Self {
            panic_channel: Some(ch),
            ..self
        }
    }
}
