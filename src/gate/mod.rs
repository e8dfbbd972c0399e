//! Access control for the dashboard.
//!
//! - [`session`] turns a request credential into an optional [`CallerIdentity`]
//! - [`path`] classifies a path as public, protected or auth-flow
//! - [`policy`] maps (identity, path, class) to allow or redirect
//! - [`matcher`] selects which requests the gate looks at
//! - [`layer`] wires them together as axum middleware

pub mod layer;
pub mod matcher;
pub mod path;
pub mod policy;
pub mod session;

pub use layer::{Gate, GateOutcome};
pub(crate) use layer::gate_middleware;
pub use matcher::MatcherSet;
pub use path::{PathClass, PathClassifier, is_under};
pub use policy::{Decision, RedirectPolicy};
pub use session::{
    CallerIdentity, Claims, CredentialError, InvalidCredential, SessionIssuer, SessionResolver,
};
