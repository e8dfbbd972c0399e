//! # dashgate
//!
//! Session-gated access control for a server-rendered dashboard, built on
//! Axum and configured through TOML.
//!
//! Every request selected by the gate's matchers goes through three pure
//! steps:
//!
//! 1. [`SessionResolver`] turns the session cookie (or a bearer token) into an
//!    optional [`CallerIdentity`]. Missing, malformed, forged and expired
//!    tokens all resolve to "no caller".
//! 2. [`PathClassifier`] labels the path `public`, `protected` or `auth-flow`
//!    by whole path segment, so `/dashboardx` is not under `/dashboard`.
//! 3. [`RedirectPolicy`] decides, first match wins:
//!    root with a caller goes to the dashboard, root without one goes to
//!    sign-in, a protected path without a caller goes to
//!    `/auth/signin?callbackUrl=<path>`, an auth-flow path with a caller goes
//!    to the dashboard, and anything else is allowed.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use dashgate::{Config, FluentRouter, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::from_rust_env()?; // config/{RUST_ENV}.toml
//!     config.setup_tracing();
//!
//!     FluentRouter::without_state(config)?
//!         .setup_pages()
//!         .setup_mock_integrations()
//!         .setup_middleware()
//!         .await?
//!         .start()
//!         .await
//! }
//! ```
//!
//! With `config/dev.toml`:
//!
//! ```toml
//! [http]
//! bind_port = 3000
//!
//! [auth]
//! secret = "{{ DASHGATE_SECRET }}"
//!
//! [gate]
//! protected_roots = ["/dashboard", "/settings"]
//! ```
//!
//! A missing secret or an inconsistent `[gate]` section is a configuration
//! error and the server refuses to start.
//!
//! # Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`gate`] | Resolver, classifier, policy, matchers and the middleware ([`Gate`]) |
//! | [`pages`] | Dashboard, settings and auth pages |
//! | [`api`] | Mock bank-link JSON endpoints |
//! | `config` | Configuration loading and validation ([`Config`]) |
//! | `fluent` | Router builder and middleware setup ([`FluentRouter`]) |
//! | `error` | Error types ([`Error`]) |
mod config;
mod error;
mod fluent;
mod utils;

pub mod api;
pub mod gate;
pub mod pages;

pub use config::*;
pub use error::*;
pub use fluent::*;
pub use gate::*;
pub use utils::*;

pub type Result<T> = std::result::Result<T, Error>;
