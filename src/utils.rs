//!
//! Small helpers shared by the configuration layer and the gate.
//!
//! - [`Sensitive`] keeps secrets out of debug output and zeroizes them on drop
//! - [`RequestIdGenerator`] preserves or mints `x-request-id` values
//! - [`replace_handlebars_with_env`] expands `{{ VAR }}` in config files
//! - [`is_local_path`] decides whether a callback target stays on this site
//!

use {
    http::{HeaderValue, Request},
    regex::{Captures, Regex},
    serde::Deserialize,
    std::{env, sync::LazyLock},
    tower_http::request_id::{MakeRequestId, RequestId},
    uuid::{ContextV7, Timestamp, Uuid},
    zeroize::{Zeroize, ZeroizeOnDrop},
};

static HANDLEBAR_REGEXP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([A-Z0-9_]+)\s*\}\}").unwrap());

/// Wrapper for secrets such as the session signing key.
///
/// `Debug` prints `Sensitive(****)` and the inner value is zeroized on drop.
#[derive(Clone, Deserialize, Default, Zeroize, ZeroizeOnDrop)]
#[serde(transparent)]
pub struct Sensitive<T: Default + Zeroize>(pub T);

impl Sensitive<String> {
    pub fn from(s: &str) -> Self {
        Self(s.to_string())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// True when the secret is empty or only whitespace.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl<T: Default + Zeroize + PartialEq> PartialEq for Sensitive<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T: Default + Zeroize> std::fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sensitive(****)")
    }
}

/// Keeps an incoming `x-request-id` or generates a UUIDv7.
#[derive(Debug, Clone, Copy)]
pub struct RequestIdGenerator;

impl MakeRequestId for RequestIdGenerator {
    fn make_request_id<B>(&mut self, req: &Request<B>) -> Option<RequestId> {
        match req.headers().get("x-request-id") {
            Some(value) => Some(RequestId::new(value.clone())),
            None => {
                let cx = ContextV7::new().with_additional_precision();
                let uuid = Uuid::new_v7(Timestamp::now(cx));
                let value = HeaderValue::from_str(&uuid.to_string()).ok()?;
                Some(RequestId::new(value))
            }
        }
    }
}

/// Replaces `{{ VAR }}` with the value of the environment variable `VAR`.
///
/// Unset variables become the empty string and are logged at `warn`. An empty
/// `auth.secret` produced this way is then rejected by config validation.
pub fn replace_handlebars_with_env(input: &str) -> String {
    HANDLEBAR_REGEXP
        .replace_all(input, |caps: &Captures| {
            let var_name = &caps[1];
            env::var(var_name).unwrap_or_else(|_| {
                tracing::warn!(
                    variable = %var_name,
                    "Environment variable not found, substituting with empty string"
                );
                String::new()
            })
        })
        .to_string()
}

/// Returns true for an absolute path on this origin (`/x`), rejecting
/// protocol-relative (`//host`) and backslash tricks (`/\host`).
pub fn is_local_path(target: &str) -> bool {
    target.starts_with('/')
        && !target.starts_with("//")
        && !target.starts_with("/\\")
        && !target.chars().any(char::is_control)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn handlebars_no_pattern_unchanged(s in "[^{}]*") {
            let result = replace_handlebars_with_env(&s);
            prop_assert_eq!(result, s);
        }

        #[test]
        fn handlebars_never_panics(s in ".*") {
            let _ = replace_handlebars_with_env(&s);
        }

        #[test]
        fn handlebars_valid_pattern_substituted(
            var_name in "[A-Z][A-Z0-9_]{0,10}",
            var_value in "[a-zA-Z0-9_]{1,20}",
            prefix in "[^{}]{0,10}",
            suffix in "[^{}]{0,10}"
        ) {
            let test_var = format!("PROPTEST_{var_name}");
            unsafe { std::env::set_var(&test_var, &var_value); }

            let input = format!("{prefix}{{{{ {test_var} }}}}{suffix}");
            let result = replace_handlebars_with_env(&input);

            unsafe { std::env::remove_var(&test_var); }

            prop_assert_eq!(result, format!("{prefix}{var_value}{suffix}"));
        }

        #[test]
        fn sensitive_debug_hides_value(s in "[a-zA-Z0-9]{5,50}") {
            let sensitive = Sensitive::from(s.as_str());
            let debug_output = format!("{:?}", sensitive);
            prop_assert!(debug_output.contains("****"));
            prop_assert!(!debug_output.contains(&s));
        }

        #[test]
        fn local_paths_accepted(segments in proptest::collection::vec("[a-z0-9_-]{1,8}", 0..5)) {
            let path = format!("/{}", segments.join("/"));
            prop_assert!(is_local_path(&path));
        }
    }

    #[test]
    fn test_secret_from_missing_env_is_blank() {
        unsafe { std::env::remove_var("DASHGATE_TEST_UNSET_SECRET") };
        let text = replace_handlebars_with_env("{{ DASHGATE_TEST_UNSET_SECRET }}");
        assert!(Sensitive::from(text.as_str()).is_blank());
    }

    #[test]
    fn test_sensitive_expose() {
        let secret = Sensitive::from("hunter2");
        assert_eq!(secret.expose(), "hunter2");
        assert!(!secret.is_blank());
        assert!(Sensitive::from("   ").is_blank());
    }

    #[test]
    fn test_is_local_path_rejects_offsite_targets() {
        assert!(is_local_path("/settings/billing"));
        assert!(is_local_path("/"));
        assert!(!is_local_path("https://evil.example"));
        assert!(!is_local_path("//evil.example/x"));
        assert!(!is_local_path("/\\evil.example"));
        assert!(!is_local_path("dashboard"));
        assert!(!is_local_path("/a\nb"));
        assert!(!is_local_path(""));
    }

    #[test]
    fn test_request_id_generator_preserves_header() {
        let request = Request::builder()
            .header("x-request-id", "abc-123")
            .body(())
            .unwrap();
        let id = RequestIdGenerator.make_request_id(&request).unwrap();
        assert_eq!(id.header_value(), "abc-123");
    }

    #[test]
    fn test_request_id_generator_mints_uuid_v7() {
        let request = Request::builder().body(()).unwrap();
        let id = RequestIdGenerator.make_request_id(&request).unwrap();
        let uuid = Uuid::parse_str(id.header_value().to_str().unwrap()).unwrap();
        assert_eq!(uuid.get_version_num(), 7);
    }
}
