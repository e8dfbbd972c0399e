//! FluentRouter and middleware configuration.
//!
//! - [`router`] - Core `FluentRouter` struct and initialization
//! - [`gate`] - Gate enforcement and user span
//! - [`routes`] - Pages and mock integrations
//! - [`observability`] - Request logging
//! - [`request`] - Payload limit, request ID, sensitive headers
//! - [`features`] - Path normalization, timeout, liveness
//! - [`control`] - Panic catching
//! - [`builder`] - Orchestration (setup_middleware, start, router delegation)
//! - [`shutdown`] - Shutdown phases and cancellation

mod user_span;

mod builder;
mod control;
mod features;
mod gate;
mod observability;
mod request;
mod router;
mod routes;
mod shutdown;

pub use router::FluentRouter;
pub use shutdown::{ShutdownNotifier, ShutdownPhase};

#[cfg(test)]
mod tests;
