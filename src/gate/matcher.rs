//! Matcher patterns selecting which requests the gate intercepts.
//!
//! Patterns are literal segments optionally ending in one named parameter:
//!
//! | pattern             | matches                                  |
//! |---------------------|------------------------------------------|
//! | `/`                 | exactly `/`                              |
//! | `/dashboard`        | exactly `/dashboard`                     |
//! | `/dashboard/:id`    | one segment below `/dashboard`           |
//! | `/dashboard/:id?`   | `/dashboard` or one segment below        |
//! | `/dashboard/:path+` | one or more segments below `/dashboard`  |
//! | `/dashboard/:path*` | `/dashboard` and everything below it     |

use {
    crate::{Error, Result},
    regex::RegexSet,
};

/// A compiled set of matcher patterns.
#[derive(Debug, Clone)]
pub struct MatcherSet {
    patterns: Vec<String>,
    set: RegexSet,
}

impl MatcherSet {
    pub fn compile<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns: Vec<String> = patterns
            .into_iter()
            .map(|p| p.as_ref().to_string())
            .collect();
        let regexes = patterns
            .iter()
            .map(|p| pattern_to_regex(p))
            .collect::<Result<Vec<_>>>()?;
        let set = RegexSet::new(regexes)?;
        Ok(Self { patterns, set })
    }

    /// True when `path` matches at least one pattern. A trailing slash on the
    /// path is ignored.
    pub fn matches(&self, path: &str) -> bool {
        let path = match path.strip_suffix('/') {
            Some(trimmed) if !trimmed.is_empty() => trimmed,
            _ => path,
        };
        self.set.is_match(path)
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

fn pattern_to_regex(pattern: &str) -> Result<String> {
    if !pattern.starts_with('/') {
        return Err(Error::misconfigured_gate(format!(
            "matcher {pattern:?} must start with '/'"
        )));
    }
    if pattern == "/" {
        return Ok("^/$".into());
    }

    let segments: Vec<&str> = pattern[1..].split('/').collect();
    let mut regex = String::from("^");

    for (index, segment) in segments.iter().enumerate() {
        let Some(param) = segment.strip_prefix(':') else {
            if segment.is_empty() {
                return Err(Error::misconfigured_gate(format!(
                    "matcher {pattern:?} contains an empty segment"
                )));
            }
            regex.push('/');
            regex.push_str(&regex::escape(segment));
            continue;
        };

        let (name, modifier) = match param.char_indices().last() {
            Some((i, m @ ('*' | '+' | '?'))) => (&param[..i], Some(m)),
            _ => (param, None),
        };
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(Error::misconfigured_gate(format!(
                "matcher {pattern:?} has an invalid parameter name"
            )));
        }
        if modifier.is_some() && index + 1 != segments.len() {
            return Err(Error::misconfigured_gate(format!(
                "matcher {pattern:?} may only use '*', '+' or '?' on its last segment"
            )));
        }

        regex.push_str(match modifier {
            Some('*') => "(?:/.*)?",
            Some('+') => "/.+",
            Some('?') => "(?:/[^/]+)?",
            _ => "/[^/]+",
        });
    }

    regex.push('$');
    Ok(regex)
}
