//! Shutdown notifications.
//!
//! A [`CancellationToken`] for background tasks that only need to stop, and a
//! [`ShutdownNotifier`] broadcasting each [`ShutdownPhase`] for components
//! that react differently per phase.
//!
//! ```rust,no_run
//! use dashgate::{Config, FluentRouter, ShutdownPhase};
//!
//! # async fn example() -> dashgate::Result<()> {
//! let router = FluentRouter::without_state(Config::default())?;
//! let mut shutdown_rx = router.shutdown_notifier().subscribe();
//!
//! tokio::spawn(async move {
//!     while let Ok(phase) = shutdown_rx.recv().await {
//!         if let ShutdownPhase::GracePeriodStarted { timeout } = phase {
//!             tracing::info!("Draining for {}s", timeout.as_secs());
//!         }
//!     }
//! });
//! # Ok(())
//! # }
//! ```

use std::time::Duration;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

/// The phases of a graceful shutdown, emitted in this order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShutdownPhase {
    /// SIGTERM or SIGINT received. The cancellation token fires and the
    /// listener stops accepting connections.
    Initiated,

    /// In-flight requests are draining for at most `timeout`.
    GracePeriodStarted { timeout: Duration },

    /// The grace period expired; remaining requests are abandoned.
    GracePeriodEnded,
}

/// Broadcasts [`ShutdownPhase`] events and owns the shutdown
/// [`CancellationToken`]. Clones share the same channel and token.
#[derive(Clone)]
pub struct ShutdownNotifier {
    sender: broadcast::Sender<ShutdownPhase>,
    cancel_token: CancellationToken,
}

impl ShutdownNotifier {
    /// `capacity` is the number of unread phases buffered per subscriber.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            cancel_token: CancellationToken::new(),
        }
    }

    /// Subscribers only see phases emitted after they subscribed.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ShutdownPhase> {
        self.sender.subscribe()
    }

    /// Cancelled when [`ShutdownPhase::Initiated`] is emitted.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    #[must_use]
    pub fn is_shutdown_initiated(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    /// Returns the number of subscribers reached.
    pub(crate) fn emit(&self, phase: ShutdownPhase) -> usize {
        if phase == ShutdownPhase::Initiated {
            self.cancel_token.cancel();
        }

        // No receivers is not an error.
        self.sender.send(phase).unwrap_or(0)
    }
}

impl Default for ShutdownNotifier {
    fn default() -> Self {
        Self::new(16)
    }
}

impl std::fmt::Debug for ShutdownNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShutdownNotifier")
            .field("subscriber_count", &self.sender.receiver_count())
            .field("is_shutdown_initiated", &self.is_shutdown_initiated())
            .finish()
    }
}
