//! Panic catching.

use super::router::FluentRouter;
use crate::HttpMiddleware;

use {
    http::{Response, StatusCode},
    tower_http::catch_panic::CatchPanicLayer,
};

impl<State> FluentRouter<State>
where
    State: Clone + Send + Sync + 'static,
{
    /// Sets up panic catching middleware.
    ///
    /// A panicking handler yields a `500 Internal Server Error` instead of
    /// tearing down the connection. The panic message is logged and, when a
    /// channel was registered with
    /// [`with_panic_notification_channel`](FluentRouter::with_panic_notification_channel),
    /// forwarded to it.
    ///
    /// ```rust,no_run
    /// # use dashgate::{Config, FluentRouter};
    /// # async fn example() -> dashgate::Result<()> {
    /// let (tx, rx) = tokio::sync::mpsc::channel(100);
    ///
    /// FluentRouter::without_state(Config::default())?
    ///     .with_panic_notification_channel(tx)
    ///     .setup_catch_panic();
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn setup_catch_panic(mut self) -> Self {
        if !self.is_middleware_enabled(HttpMiddleware::CatchPanic) {
            return self;
        }

        let panic_channel = self.panic_channel.clone();
        self.inner = self.inner.layer(CatchPanicLayer::custom(
            move |err: Box<dyn std::any::Any + Send + 'static>| {
                let msg = if let Some(s) = err.downcast_ref::<String>() {
                    format!("Service panicked: {}", s)
                } else if let Some(s) = err.downcast_ref::<&str>() {
                    format!("Service panicked: {}", s)
                } else {
                    "`CatchPanic` was unable to downcast the panic info".to_string()
                };

                tracing::error!("{}", msg);
                if let Some(ch) = &panic_channel {
                    ch.try_send(msg).ok();
                }

                // Must not panic inside the panic handler.
                Response::builder()
                    .status(StatusCode::INTERNAL_SERVER_ERROR)
                    .header(http::header::CONTENT_TYPE, "text/plain; charset=utf-8")
                    .body("Internal Server Error".to_string())
                    .unwrap_or_else(|_| Response::new("Internal Server Error".to_string()))
            },
        ));
        self
    }
}
