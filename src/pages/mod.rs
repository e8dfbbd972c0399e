//! Server-rendered pages behind the gate.
//!
//! The gate is what keeps anonymous callers out of protected pages and
//! signed-in callers out of the auth flow. Handlers here still look at the
//! identity themselves so a page never renders for the wrong caller even when
//! a matcher is misconfigured.

mod auth;
mod dashboard;

pub use auth::{AuthErrorCode, auth_error, sign_in, sign_out, sign_out_page};
pub use dashboard::{protected_page, root};

use {
    crate::{Config, Gate},
    axum::{
        Router,
        response::Html,
        routing::{MethodRouter, get, post},
    },
    std::{collections::HashSet, sync::Arc},
};

/// Route for the sign-out action. Sits outside the default matchers so a
/// signed-in caller can reach it.
pub const SIGN_OUT_ACTION: &str = "/api/auth/signout";

/// Shared state of the page handlers.
#[derive(Debug, Clone)]
pub struct PageState {
    pub gate: Arc<Gate>,
    pub provider_signin_url: Arc<str>,
}

impl PageState {
    pub fn new(gate: Arc<Gate>, config: &Config) -> Self {
        Self {
            gate,
            provider_signin_url: Arc::from(config.auth.provider_signin_url.as_str()),
        }
    }
}

/// Builds the page routes for the paths configured in `[gate]`.
///
/// The root, every protected root (bare, with a trailing slash and with a
/// tail), the sign-in page, and the sign-out and error pages under the auth
/// root.
pub fn router<S>(state: PageState, config: &Config) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let gate = &config.gate;
    let auth_root = gate.auth_root.trim_end_matches('/');
    let mut seen = HashSet::new();
    let mut router: Router<PageState> = Router::new();

    let mut add = |router: Router<PageState>, path: String, route: MethodRouter<PageState>| {
        if seen.insert(path.clone()) {
            router.route(&path, route)
        } else {
            tracing::warn!(path = %path, "Page route registered twice, keeping the first");
            router
        }
    };

    router = add(router, gate.root.clone(), get(root));
    for protected in &gate.protected_roots {
        let protected = protected.trim_end_matches('/');
        router = add(router, protected.to_string(), get(protected_page));
        // `{*rest}` never matches an empty tail, and trailing-slash trimming
        // runs after routing.
        router = add(router, format!("{protected}/"), get(protected_page));
        router = add(router, format!("{protected}/{{*rest}}"), get(protected_page));
    }
    router = add(router, gate.sign_in.clone(), get(sign_in));
    router = add(router, format!("{auth_root}/signout"), get(sign_out_page));
    router = add(router, format!("{auth_root}/error"), get(auth_error));
    router = add(router, SIGN_OUT_ACTION.to_string(), post(sign_out));

    router.with_state(state)
}

/// Escapes text for HTML element content and attribute values.
pub(crate) fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Wraps `body` in the common page shell. `title` is escaped, `body` is not.
pub(crate) fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n</head>\n<body>\n<main>\n{}\n</main>\n</body>\n</html>\n",
        escape_html(title),
        body
    ))
}
