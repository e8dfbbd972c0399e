mod middleware;

pub use middleware::*;

use {crate::Result, serde::Deserialize, std::time::Duration};

///
/// HTTP server settings.
///
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Address to bind to. Defaults to `127.0.0.1`.
    #[serde(default = "HttpConfig::default_bind_addr")]
    pub bind_addr: String,

    /// Port to bind to. Defaults to `3000`.
    #[serde(default = "HttpConfig::default_bind_port")]
    pub bind_port: u16,

    /// Optional per-request timeout, for example `"30s"`.
    #[serde(default, with = "humantime_serde")]
    pub request_timeout: Option<Duration>,

    /// Largest accepted request body. Defaults to 32 KiB, which is plenty for
    /// the JSON bodies the mock integration routes accept.
    #[serde(default = "HttpConfig::default_max_payload_size_bytes")]
    pub max_payload_size_bytes: byte_unit::Byte,

    #[serde(default = "HttpConfig::default_trim_trailing_slash")]
    pub trim_trailing_slash: bool,

    #[serde(default = "HttpConfig::default_liveness_route")]
    pub liveness_route: String,

    /// How long in-flight requests may drain after SIGINT/SIGTERM.
    #[serde(
        default = "HttpConfig::default_shutdown_timeout",
        with = "humantime_serde"
    )]
    pub shutdown_timeout: Duration,

    #[serde(flatten)]
    pub middleware: Option<HttpMiddlewareConfig>,
}

impl HttpConfig {
    pub fn full_bind_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.bind_port)
    }

    fn default_bind_addr() -> String {
        "127.0.0.1".into()
    }

    fn default_bind_port() -> u16 {
        3000
    }

    fn default_max_payload_size_bytes() -> byte_unit::Byte {
        byte_unit::Byte::from_u64(32 * 1024)
    }

    fn default_trim_trailing_slash() -> bool {
        true
    }

    fn default_liveness_route() -> String {
        "/live".into()
    }

    fn default_shutdown_timeout() -> Duration {
        Duration::from_secs(30)
    }

    pub fn validate(&self) -> Result<()> {
        if self.bind_addr.trim().is_empty() {
            return Err(crate::Error::invalid_input(
                "HTTP bind_addr is required. Set [http] bind_addr = \"0.0.0.0\" or \"127.0.0.1\" in config.",
            ));
        }

        if self.bind_addr.parse::<std::net::IpAddr>().is_err() {
            return Err(crate::Error::invalid_input(
                "HTTP bind_addr must be a valid IP address. Examples: \"127.0.0.1\", \"0.0.0.0\", \"::1\"",
            ));
        }

        if !self.liveness_route.starts_with('/') {
            return Err(crate::Error::invalid_input(
                "HTTP liveness_route must start with '/'",
            ));
        }

        if self.max_payload_size_bytes.as_u64() == 0 {
            return Err(crate::Error::invalid_input(
                "HTTP max_payload_size_bytes must be > 0",
            ));
        }

        if let Some(middleware_config) = &self.middleware {
            middleware_config.validate()?;
        }

        Ok(())
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        HttpConfig {
            bind_addr: Self::default_bind_addr(),
            bind_port: Self::default_bind_port(),
            request_timeout: None,
            max_payload_size_bytes: Self::default_max_payload_size_bytes(),
            trim_trailing_slash: Self::default_trim_trailing_slash(),
            liveness_route: Self::default_liveness_route(),
            shutdown_timeout: Self::default_shutdown_timeout(),
            middleware: None,
        }
    }
}
