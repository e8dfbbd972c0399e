use {
    crate::{Error, Result, Sensitive},
    serde::Deserialize,
    std::{env, time::Duration},
};

/// Name of the environment variable holding the session signing secret.
pub const SECRET_ENV_VAR: &str = "DASHGATE_SECRET";

///
/// Configuration for verifying (and, for local testing, issuing) session tokens.
///
/// ```toml
/// [auth]
/// secret = "{{ DASHGATE_SECRET }}"
/// cookie_name = "session_token"
/// leeway = "5s"
/// token_ttl = "30d"
/// ```
///
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Shared HMAC secret used to verify session tokens.
    /// Defaults to the `DASHGATE_SECRET` environment variable. An empty secret
    /// is a fatal configuration error.
    #[serde(default = "AuthConfig::default_secret")]
    pub secret: Sensitive<String>,

    /// Cookie carrying the session token.
    #[serde(default = "AuthConfig::default_cookie_name")]
    pub cookie_name: String,

    /// Also accept `Authorization: Bearer <token>` when no cookie is present.
    #[serde(default = "AuthConfig::default_accept_bearer")]
    pub accept_bearer: bool,

    /// Clock skew tolerated when checking `exp`.
    #[serde(default = "AuthConfig::default_leeway", with = "humantime_serde")]
    pub leeway: Duration,

    /// Lifetime of tokens minted by [`SessionIssuer`](crate::SessionIssuer).
    #[serde(default = "AuthConfig::default_token_ttl", with = "humantime_serde")]
    pub token_ttl: Duration,

    /// When set, tokens must carry this `iss` claim.
    #[serde(default)]
    pub issuer: Option<String>,

    /// Where the sign-in page sends the caller to authenticate with the
    /// identity provider. dashgate does not serve this route: it belongs to the
    /// provider or to the auth service in front of dashgate, which sets the
    /// session cookie and returns to `callbackUrl`. Either a same-origin path
    /// or an absolute `http(s)://` URL.
    #[serde(default = "AuthConfig::default_provider_signin_url")]
    pub provider_signin_url: String,
}

impl AuthConfig {
    fn default_secret() -> Sensitive<String> {
        Sensitive(env::var(SECRET_ENV_VAR).unwrap_or_default())
    }

    fn default_cookie_name() -> String {
        "session_token".into()
    }

    fn default_accept_bearer() -> bool {
        true
    }

    fn default_leeway() -> Duration {
        Duration::from_secs(5)
    }

    fn default_token_ttl() -> Duration {
        Duration::from_secs(30 * 24 * 60 * 60)
    }

    fn default_provider_signin_url() -> String {
        "/api/auth/signin/google".into()
    }

    pub fn validate(&self) -> Result<()> {
        if self.secret.is_blank() {
            return Err(Error::misconfigured_gate(format!(
                "auth secret is empty. Set {SECRET_ENV_VAR} or [auth] secret in config."
            )));
        }

        if self.secret.expose().len() < 32 {
            tracing::warn!("auth secret is shorter than 32 bytes; use a longer random value");
        }

        let valid_cookie_name = !self.cookie_name.is_empty()
            && self
                .cookie_name
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b"-_.".contains(&b));
        if !valid_cookie_name {
            return Err(Error::misconfigured_gate(
                "auth cookie_name must be non-empty and contain only [A-Za-z0-9-_.]",
            ));
        }

        let url = self.provider_signin_url.as_str();
        let valid_provider_url = (url.starts_with('/') && !url.starts_with("//"))
            || url.starts_with("https://")
            || url.starts_with("http://");
        if !valid_provider_url {
            return Err(Error::misconfigured_gate(format!(
                "auth provider_signin_url must be a path or an http(s) URL, got {url:?}"
            )));
        }

        if self.token_ttl.is_zero() {
            return Err(Error::misconfigured_gate("auth token_ttl must be > 0"));
        }

        if self.issuer.as_ref().is_some_and(|iss| iss.trim().is_empty()) {
            return Err(Error::misconfigured_gate(
                "auth issuer must not be blank. Remove it or set a value.",
            ));
        }

        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        AuthConfig {
            secret: Self::default_secret(),
            cookie_name: Self::default_cookie_name(),
            accept_bearer: Self::default_accept_bearer(),
            leeway: Self::default_leeway(),
            token_ttl: Self::default_token_ttl(),
            issuer: None,
            provider_signin_url: Self::default_provider_signin_url(),
        }
    }
}
