use crate::{Error, Result};
use serde::Deserialize;

/// Selects which middleware `setup_middleware()` installs.
///
/// ```toml
/// [http]
/// exclude = ["timeout"]
/// ```
#[derive(Debug, Clone, Deserialize)]
pub enum HttpMiddlewareConfig {
    #[serde(alias = "include")]
    Include(Vec<HttpMiddleware>),
    #[serde(alias = "exclude")]
    Exclude(Vec<HttpMiddleware>),
}

impl HttpMiddlewareConfig {
    pub fn is_enabled(&self, middleware: HttpMiddleware) -> bool {
        match self {
            HttpMiddlewareConfig::Include(list) => list.contains(&middleware),
            HttpMiddlewareConfig::Exclude(list) => !list.contains(&middleware),
        }
    }

    /// Validates middleware dependencies are satisfied.
    ///
    /// # Dependencies
    ///
    /// - `Gate` can never be disabled: a server without it would serve every
    ///   protected page to anonymous callers.
    /// - `UserSpan` requires `Logging` (it records into the request span).
    pub fn validate(&self) -> Result<()> {
        if !self.is_enabled(HttpMiddleware::Gate) {
            return Err(Error::misconfigured_gate(
                "the gate middleware cannot be disabled. Remove 'gate' from the Exclude list or add it to the Include list.",
            ));
        }

        if self.is_enabled(HttpMiddleware::UserSpan) && !self.is_enabled(HttpMiddleware::Logging) {
            return Err(Error::invalid_input(
                "UserSpan requires Logging. Remove 'logging' from the Exclude list or add both to the Include list.",
            ));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum HttpMiddleware {
    Gate,
    UserSpan,
    MaxPayloadSize,
    PathNormalization,
    SensitiveHeaders,
    RequestId,
    Logging,
    Liveness,
    Timeout,
    CatchPanic,
}
