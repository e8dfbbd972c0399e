//! The ordered redirect rules applied to every gated request.

use {
    super::{CallerIdentity, PathClass},
    crate::GateConfig,
    percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode},
};

/// Characters escaped in the `callbackUrl` value. `/` stays readable so a
/// callback reads as the path it names.
const CALLBACK_VALUE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b'<')
    .add(b'=')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Outcome of the gate for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Forward the request unchanged.
    Allow,
    /// Answer with a redirect to this target instead.
    RedirectTo(String),
}

impl Decision {
    pub fn is_allow(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub fn target(&self) -> Option<&str> {
        match self {
            Decision::Allow => None,
            Decision::RedirectTo(target) => Some(target),
        }
    }
}

/// Where callers belong, as a function of who they are and what they asked for.
///
/// Rules, first match wins:
///
/// 1. root with a caller: dashboard
/// 2. root without a caller: sign-in
/// 3. protected path without a caller: sign-in with `callbackUrl=<path>`
/// 4. auth-flow path with a caller: dashboard
/// 5. anything else: allow
#[derive(Debug, Clone)]
pub struct RedirectPolicy {
    root: String,
    dashboard_root: String,
    sign_in: String,
    callback_param: String,
}

impl RedirectPolicy {
    pub fn from_config(config: &GateConfig) -> Self {
        Self {
            root: config.root.clone(),
            dashboard_root: config.dashboard_root.clone(),
            sign_in: config.sign_in.clone(),
            callback_param: config.callback_param.clone(),
        }
    }

    pub fn decide(
        &self,
        identity: Option<&CallerIdentity>,
        path: &str,
        class: PathClass,
    ) -> Decision {
        let signed_in = identity.is_some();

        if path == self.root {
            return if signed_in {
                Decision::RedirectTo(self.dashboard_root.clone())
            } else {
                Decision::RedirectTo(self.sign_in.clone())
            };
        }

        match (class, signed_in) {
            (PathClass::Protected, false) => Decision::RedirectTo(self.sign_in_with_callback(path)),
            (PathClass::AuthFlow, true) => Decision::RedirectTo(self.dashboard_root.clone()),
            _ => Decision::Allow,
        }
    }

    /// `sign_in?callbackUrl=<path>`.
    pub fn sign_in_with_callback(&self, path: &str) -> String {
        format!(
            "{}?{}={}",
            self.sign_in,
            self.callback_param,
            Self::encode_callback(path)
        )
    }

    /// Percent-encodes `path` for use as a callback query value.
    pub fn encode_callback(path: &str) -> String {
        utf8_percent_encode(path, CALLBACK_VALUE).to_string()
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn sign_in(&self) -> &str {
        &self.sign_in
    }

    pub fn dashboard_root(&self) -> &str {
        &self.dashboard_root
    }

    pub fn callback_param(&self) -> &str {
        &self.callback_param
    }
}
