use {
    crate::{Error, MatcherSet, Result, gate::is_under},
    serde::Deserialize,
};

///
/// Paths and redirect targets the gate works with.
///
/// Every field has a default matching the dashboard layout:
///
/// ```toml
/// [gate]
/// root = "/"
/// dashboard_root = "/dashboard"
/// sign_in = "/auth/signin"
/// auth_root = "/auth"
/// protected_roots = ["/dashboard", "/settings"]
/// callback_param = "callbackUrl"
/// matchers = ["/", "/dashboard/:path*", "/settings/:path*", "/auth/:path*"]
/// ```
///
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct GateConfig {
    #[serde(default = "GateConfig::default_root")]
    pub root: String,

    /// Landing page for signed-in callers.
    #[serde(default = "GateConfig::default_dashboard_root")]
    pub dashboard_root: String,

    /// Sign-in page for anonymous callers.
    #[serde(default = "GateConfig::default_sign_in")]
    pub sign_in: String,

    /// Prefix hosting sign-in, sign-out and error pages.
    #[serde(default = "GateConfig::default_auth_root")]
    pub auth_root: String,

    /// Paths (and everything below them) that require a session.
    #[serde(default = "GateConfig::default_protected_roots")]
    pub protected_roots: Vec<String>,

    /// Query parameter carrying the originally requested path on sign-in redirects.
    #[serde(default = "GateConfig::default_callback_param")]
    pub callback_param: String,

    /// Path patterns the gate intercepts. Anything else bypasses it.
    #[serde(default = "GateConfig::default_matchers")]
    pub matchers: Vec<String>,
}

impl GateConfig {
    fn default_root() -> String {
        "/".into()
    }

    fn default_dashboard_root() -> String {
        "/dashboard".into()
    }

    fn default_sign_in() -> String {
        "/auth/signin".into()
    }

    fn default_auth_root() -> String {
        "/auth".into()
    }

    fn default_protected_roots() -> Vec<String> {
        vec!["/dashboard".into(), "/settings".into()]
    }

    fn default_callback_param() -> String {
        "callbackUrl".into()
    }

    fn default_matchers() -> Vec<String> {
        vec![
            "/".into(),
            "/dashboard/:path*".into(),
            "/settings/:path*".into(),
            "/auth/:path*".into(),
        ]
    }

    pub fn validate(&self) -> Result<()> {
        for (name, path) in [
            ("root", &self.root),
            ("dashboard_root", &self.dashboard_root),
            ("sign_in", &self.sign_in),
            ("auth_root", &self.auth_root),
        ] {
            require_absolute(name, path)?;
        }

        if self.auth_root == self.root {
            return Err(Error::misconfigured_gate(
                "gate auth_root cannot be the site root",
            ));
        }

        if self.protected_roots.is_empty() {
            return Err(Error::misconfigured_gate(
                "gate protected_roots must not be empty",
            ));
        }

        for protected in &self.protected_roots {
            require_absolute("protected_roots", protected)?;

            // The root is handled by its own rules and must never double as a
            // protected prefix.
            if protected == &self.root || protected == "/" {
                return Err(Error::misconfigured_gate(
                    "gate protected_roots cannot contain the site root",
                ));
            }

            if is_under(protected, &self.auth_root) || is_under(&self.auth_root, protected) {
                return Err(Error::misconfigured_gate(format!(
                    "gate protected root {protected} overlaps auth_root {}",
                    self.auth_root
                )));
            }
        }

        // Anonymous callers are sent to sign-in, signed-in callers to the
        // dashboard. Neither target may bounce the caller straight back.
        if self.protected_roots.iter().any(|p| is_under(&self.sign_in, p)) {
            return Err(Error::misconfigured_gate(
                "gate sign_in cannot live under a protected root",
            ));
        }
        if is_under(&self.dashboard_root, &self.auth_root) {
            return Err(Error::misconfigured_gate(
                "gate dashboard_root cannot live under auth_root",
            ));
        }

        if self.callback_param.trim().is_empty() {
            return Err(Error::misconfigured_gate(
                "gate callback_param must not be empty",
            ));
        }

        if self.matchers.is_empty() {
            return Err(Error::misconfigured_gate(
                "gate matchers must not be empty; the gate would never run",
            ));
        }
        MatcherSet::compile(&self.matchers)?;

        Ok(())
    }
}

fn require_absolute(name: &str, path: &str) -> Result<()> {
    if !path.starts_with('/') {
        return Err(Error::misconfigured_gate(format!(
            "gate {name} must be an absolute path starting with '/', got {path:?}"
        )));
    }
    Ok(())
}

impl Default for GateConfig {
    fn default() -> Self {
        GateConfig {
            root: Self::default_root(),
            dashboard_root: Self::default_dashboard_root(),
            sign_in: Self::default_sign_in(),
            auth_root: Self::default_auth_root(),
            protected_roots: Self::default_protected_roots(),
            callback_param: Self::default_callback_param(),
            matchers: Self::default_matchers(),
        }
    }
}
