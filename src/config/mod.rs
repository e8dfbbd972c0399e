//!
//! Configuration for the gate server, loaded from TOML.
//!
//! Files live in `config/{RUST_ENV}.toml`. Any `{{ VAR }}` placeholder is
//! replaced by the value of the environment variable `VAR` before parsing,
//! which is how the signing secret is normally injected:
//!
//! ```toml
//! [http]
//! bind_addr = "0.0.0.0"
//! bind_port = 3000
//!
//! [auth]
//! secret = "{{ DASHGATE_SECRET }}"
//!
//! [gate]
//! protected_roots = ["/dashboard", "/settings"]
//!
//! [logging]
//! format = "json"
//! ```
//!

mod auth;
mod gate;
mod http;
mod logging;

pub use auth::*;
pub use gate::*;
pub use http::*;
pub use logging::*;

pub use byte_unit::Byte;

use {
    crate::{Error, Result, Sensitive, utils::replace_handlebars_with_env},
    serde::Deserialize,
    std::{env, fs, str::FromStr, time::Duration},
};

/// Complete configuration, passed explicitly to everything that needs it.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub gate: GateConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Loads `config/{RUST_ENV}.toml`.
    pub fn from_rust_env() -> Result<Config> {
        Self::from_toml_file(env::var("RUST_ENV")?)
    }

    /// Loads `config/{env}.toml`.
    pub fn from_toml_file(env: impl AsRef<str>) -> Result<Config> {
        let path = format!("config/{}.toml", env.as_ref());
        let text = fs::read_to_string(&path).map_err(|err| {
            Error::new(
                crate::ErrorKind::Io,
                format!("cannot read {path}: {err}"),
            )
        })?;
        Self::from_toml(&text)
    }

    pub fn from_toml(toml_str: &str) -> Result<Config> {
        toml_str.parse()
    }

    pub fn with_bind_addr<S: AsRef<str>>(mut self, addr: S) -> Self {
        self.http.bind_addr = addr.as_ref().into();
        self
    }

    pub fn with_bind_port(mut self, port: u16) -> Self {
        self.http.bind_port = port;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.http.request_timeout = Some(timeout);
        self
    }

    pub fn with_max_payload_size_bytes(mut self, size: u64) -> Self {
        self.http.max_payload_size_bytes = Byte::from_u64(size);
        self
    }

    pub fn with_trim_trailing_slash(mut self, enable: bool) -> Self {
        self.http.trim_trailing_slash = enable;
        self
    }

    pub fn with_liveness_route(mut self, route: &str) -> Self {
        self.http.liveness_route = route.into();
        self
    }

    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.http.shutdown_timeout = timeout;
        self
    }

    pub fn with_secret(mut self, secret: &str) -> Self {
        self.auth.secret = Sensitive::from(secret);
        self
    }

    pub fn with_cookie_name(mut self, name: &str) -> Self {
        self.auth.cookie_name = name.into();
        self
    }

    pub fn with_issuer(mut self, issuer: &str) -> Self {
        self.auth.issuer = Some(issuer.into());
        self
    }

    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.auth.token_ttl = ttl;
        self
    }

    pub fn with_protected_roots<I, S>(mut self, roots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.gate.protected_roots = roots.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_matchers<I, S>(mut self, matchers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.gate.matchers = matchers.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.logging.format = format;
        self
    }

    pub fn with_included_middlewares(mut self, middlewares: Vec<HttpMiddleware>) -> Self {
        self.http.middleware = Some(HttpMiddlewareConfig::Include(middlewares));
        self
    }

    pub fn with_excluded_middlewares(mut self, middlewares: Vec<HttpMiddleware>) -> Self {
        self.http.middleware = Some(HttpMiddlewareConfig::Exclude(middlewares));
        self
    }

    /// Validates every section. A failure here means the gate must not start.
    pub fn validate(&self) -> Result<()> {
        self.http.validate()?;
        self.auth.validate()?;
        self.gate.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Installs the global tracing subscriber using the configured format.
    /// Filtering follows `RUST_LOG`. Calling it twice is harmless.
    pub fn setup_tracing(&self) {
        use tracing_subscriber::{EnvFilter, prelude::*};
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        match self.logging.format {
            LogFormat::Json => {
                let _ = tracing_subscriber::registry()
                    .with(tracing_subscriber::fmt::layer().json())
                    .with(env_filter)
                    .try_init();
            }
            LogFormat::Default => {
                let _ = tracing_subscriber::registry()
                    .with(tracing_subscriber::fmt::layer())
                    .with(env_filter)
                    .try_init();
            }
            LogFormat::Compact => {
                let _ = tracing_subscriber::registry()
                    .with(tracing_subscriber::fmt::layer().compact())
                    .with(env_filter)
                    .try_init();
            }
            LogFormat::Pretty => {
                let _ = tracing_subscriber::registry()
                    .with(tracing_subscriber::fmt::layer().pretty())
                    .with(env_filter)
                    .try_init();
            }
        }
    }
}

impl FromStr for Config {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        let config_file = replace_handlebars_with_env(s);
        let config = toml::from_str::<Config>(&config_file)?;
        Ok(config)
    }
}
