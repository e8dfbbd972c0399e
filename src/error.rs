//! Error types for the gate, its configuration and the pages it serves.
//!
//! The crate-wide [`Error`] is opaque and paired with an [`ErrorKind`], in the
//! style of `std::io::Error`. Credential failures never reach this type: they
//! are modelled by [`CredentialError`](crate::CredentialError) and collapse into
//! "unauthenticated" inside the session resolver.
//!
//! # Example
//!
//! ```rust
//! use dashgate::{Error, ErrorKind};
//!
//! let error = Error::misconfigured_gate("secret is empty");
//! assert_eq!(error.kind(), ErrorKind::Configuration);
//! assert!(error.to_string().contains("secret is empty"));
//! ```
//!
//! Every [`Error`] surfaces at startup or from the CLI; request handling never
//! produces one.

use std::fmt;
use thiserror::Error;

/// The category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Token signing or other authentication plumbing failed.
    #[error("authentication error")]
    Authentication,

    /// Configuration could not be loaded or is invalid. A gate built from an
    /// invalid configuration refuses to start.
    #[error("configuration error")]
    Configuration,

    #[error("I/O error")]
    Io,

    #[error("invalid input")]
    InvalidInput,
}

/// The crate error type.
pub struct Error {
    kind: ErrorKind,
    source: Box<dyn std::error::Error + Send + Sync + 'static>,
}

impl Error {
    pub fn new<E>(kind: ErrorKind, error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        Self {
            kind,
            source: error.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl Error {
    /// A gate that cannot verify credentials must not serve traffic.
    pub fn misconfigured_gate(msg: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::Configuration,
            format!("Gate configuration error: {}", msg.into()),
        )
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, msg.into())
    }
}

// ============================================================================
// Trait implementations
// ============================================================================

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Error")
            .field("kind", &self.kind)
            .field("source", &self.source)
            .finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&*self.source)
    }
}

// ============================================================================
// From implementations
// ============================================================================

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::new(ErrorKind::Io, err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::new(ErrorKind::Configuration, err)
    }
}

impl From<std::env::VarError> for Error {
    fn from(err: std::env::VarError) -> Self {
        Self::new(ErrorKind::Configuration, err)
    }
}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Self::new(ErrorKind::Configuration, err)
    }
}

impl From<jsonwebtoken::errors::Error> for Error {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Self::new(ErrorKind::Authentication, err)
    }
}
