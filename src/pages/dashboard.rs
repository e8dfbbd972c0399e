use {
    super::{PageState, escape_html, layout},
    crate::{CallerIdentity, gate::is_under},
    axum::{
        extract::State,
        http::Uri,
        response::{IntoResponse, Redirect, Response},
    },
};

/// GET /
///
/// Never renders; sends the caller to the dashboard or to sign-in.
pub async fn root(State(state): State<PageState>, identity: Option<CallerIdentity>) -> Redirect {
    let policy = state.gate.policy();
    let target = if identity.is_some() {
        policy.dashboard_root()
    } else {
        policy.sign_in()
    };
    Redirect::temporary(target)
}

/// GET /dashboard, /settings and everything below them.
pub async fn protected_page(
    State(state): State<PageState>,
    identity: Option<CallerIdentity>,
    uri: Uri,
) -> Response {
    let path = uri.path();
    let Some(identity) = identity else {
        let target = state.gate.policy().sign_in_with_callback(path);
        return Redirect::temporary(&target).into_response();
    };

    tracing::debug!(path = %path, "Rendering protected page");
    let heading = section_heading(path, state.gate.policy().dashboard_root());
    let body = format!(
        "<header>\n<h1>{}</h1>\n<p>Welcome, {}!</p>\n</header>\n\
         <nav><form method=\"post\" action=\"{}\"><button type=\"submit\">Sign Out</button></form></nav>",
        escape_html(&heading),
        escape_html(identity.display_name()),
        super::SIGN_OUT_ACTION,
    );
    layout(&heading, &body).into_response()
}

/// "CorpBuddy Dashboard" below the dashboard root, otherwise named after the
/// first path segment ("CorpBuddy Settings").
fn section_heading(path: &str, dashboard_root: &str) -> String {
    if is_under(path, dashboard_root) {
        return "CorpBuddy Dashboard".to_string();
    }

    let section = path
        .trim_start_matches('/')
        .split('/')
        .next()
        .unwrap_or_default();
    let mut chars = section.chars();
    match chars.next() {
        Some(first) => format!("CorpBuddy {}{}", first.to_uppercase(), chars.as_str()),
        None => "CorpBuddy".to_string(),
    }
}
