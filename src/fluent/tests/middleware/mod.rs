//! Middleware-specific tests for FluentRouter.
//!
//! Tests are organized by middleware type in separate modules.

#[cfg(feature = "payload-limit")]
mod max_payload_size;
#[cfg(feature = "path-normalization")]
mod path_normalization;
#[cfg(feature = "sensitive-headers")]
mod sensitive_headers;

mod catch_panic;
mod config;
mod liveness;
mod request_id;
mod timeout;
mod user_span;
