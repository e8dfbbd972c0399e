//! Classification of request paths into the three classes the gate reasons about.

use crate::GateConfig;
use std::fmt;

/// The access class of a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathClass {
    /// Reachable with or without a session.
    Public,
    /// Requires a session.
    Protected,
    /// Sign-in, sign-out and error pages. Only for callers without a session.
    AuthFlow,
}

impl fmt::Display for PathClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathClass::Public => write!(f, "public"),
            PathClass::Protected => write!(f, "protected"),
            PathClass::AuthFlow => write!(f, "auth-flow"),
        }
    }
}

/// Returns true when `path` is `root` or lies below it, comparing whole
/// segments: `/dashboard/x` is under `/dashboard`, `/dashboardx` is not.
pub fn is_under(path: &str, root: &str) -> bool {
    let root = trim_trailing_slash(root);
    if root.is_empty() {
        return path.starts_with('/');
    }
    match path.strip_prefix(root) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

fn trim_trailing_slash(path: &str) -> &str {
    path.strip_suffix('/').unwrap_or(path)
}

/// Maps a path to its [`PathClass`].
///
/// Classification depends only on the path and the configured roots, never on
/// who is asking. Protected roots win over the auth root; config validation
/// keeps them disjoint anyway.
#[derive(Debug, Clone)]
pub struct PathClassifier {
    protected_roots: Vec<String>,
    auth_root: String,
}

impl PathClassifier {
    pub fn new<I, S>(protected_roots: I, auth_root: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            protected_roots: protected_roots.into_iter().map(Into::into).collect(),
            auth_root: auth_root.into(),
        }
    }

    pub fn from_config(config: &GateConfig) -> Self {
        Self::new(config.protected_roots.iter().cloned(), config.auth_root.clone())
    }

    pub fn classify(&self, path: &str) -> PathClass {
        if self.protected_roots.iter().any(|root| is_under(path, root)) {
            PathClass::Protected
        } else if is_under(path, &self.auth_root) {
            PathClass::AuthFlow
        } else {
            PathClass::Public
        }
    }
}
