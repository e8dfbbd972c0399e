use {
    super::{PageState, SIGN_OUT_ACTION, escape_html, layout},
    crate::{RedirectPolicy, is_local_path},
    axum::{
        extract::{Query, State},
        response::{Html, IntoResponse, Redirect},
    },
    axum_extra::extract::cookie::{Cookie, CookieJar},
    serde::Deserialize,
    std::collections::HashMap,
};

/// Error codes the identity provider may send back to the error page.
///
/// Anything unrecognised maps to [`AuthErrorCode::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorCode {
    Configuration,
    AccessDenied,
    Verification,
    Unknown,
}

impl AuthErrorCode {
    pub fn parse(code: Option<&str>) -> Self {
        match code {
            Some("Configuration") => AuthErrorCode::Configuration,
            Some("AccessDenied") => AuthErrorCode::AccessDenied,
            Some("Verification") => AuthErrorCode::Verification,
            _ => AuthErrorCode::Unknown,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            AuthErrorCode::Configuration => "There is a problem with the server configuration.",
            AuthErrorCode::AccessDenied => "You do not have access to this resource.",
            AuthErrorCode::Verification => {
                "The verification link may have been used or is invalid."
            }
            AuthErrorCode::Unknown => "An unknown error occurred during authentication.",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AuthErrorParams {
    pub error: Option<String>,
}

/// GET /auth/signin
///
/// The callback is only echoed when it is a local path; anything else falls
/// back to the dashboard so the page cannot be used as an open redirect.
pub async fn sign_in(
    State(state): State<PageState>,
    Query(params): Query<HashMap<String, String>>,
) -> Html<String> {
    let policy = state.gate.policy();
    let callback = params
        .get(policy.callback_param())
        .map(String::as_str)
        .filter(|target| is_local_path(target))
        .unwrap_or(policy.dashboard_root());

    let provider = format!(
        "{}?{}={}",
        state.provider_signin_url,
        policy.callback_param(),
        RedirectPolicy::encode_callback(callback)
    );

    let body = format!(
        "<h1>Sign In</h1>\n<p>Sign in to continue to <code>{}</code>.</p>\n\
         <a href=\"{}\">Sign In with Google</a>",
        escape_html(callback),
        escape_html(&provider),
    );
    layout("Sign In", &body)
}

/// GET /auth/signout
pub async fn sign_out_page() -> Html<String> {
    let body = format!(
        "<h1>Sign Out</h1>\n<p>Are you sure you want to sign out?</p>\n\
         <form method=\"post\" action=\"{SIGN_OUT_ACTION}\">\
         <button type=\"submit\">Yes, Sign Out</button></form>\n\
         <a href=\"javascript:history.back()\">Cancel</a>"
    );
    layout("Sign Out", &body)
}

/// GET /auth/error?error=CODE
pub async fn auth_error(
    State(state): State<PageState>,
    Query(params): Query<AuthErrorParams>,
) -> Html<String> {
    let code = AuthErrorCode::parse(params.error.as_deref());
    tracing::debug!(code = ?code, "Rendering authentication error page");

    let body = format!(
        "<h1>Authentication Error</h1>\n<p>{}</p>\n<a href=\"{}\">Try Again</a>\n\
         <footer>If the problem persists, please contact support.</footer>",
        escape_html(code.message()),
        escape_html(state.gate.policy().sign_in()),
    );
    layout("Authentication Error", &body)
}

/// POST /api/auth/signout
///
/// Expires the session cookie and sends the caller back to the root, which
/// forwards to sign-in.
pub async fn sign_out(State(state): State<PageState>, jar: CookieJar) -> impl IntoResponse {
    let name = state.gate.resolver().cookie_name().to_string();
    let root = state.gate.policy().root().to_string();
    (
        jar.remove(Cookie::build((name, "")).path("/")),
        Redirect::to(&root),
    )
}
