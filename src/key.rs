//! Setting identifiers and their env-var / CLI-flag renderings
//!
//! A [`Key`] names one setting or secret across every source. Structured keys
//! carry an optional namespace (`http/port`); raw keys are opaque strings that
//! pass through both formatters verbatim.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for a setting or secret.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Key {
    /// Structured identifier with an optional namespace segment
    Ident {
        namespace: Option<String>,
        name: String,
    },
    /// Verbatim string, formatted as-is
    Raw(String),
}

impl Key {
    /// Create a namespaced key
    pub fn namespaced(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Key::Ident {
            namespace: Some(namespace.into()),
            name: name.into(),
        }
    }

    /// Create an un-namespaced key
    pub fn name(name: impl Into<String>) -> Self {
        Key::Ident {
            namespace: None,
            name: name.into(),
        }
    }

    /// Create a raw key that both formatters pass through unchanged
    pub fn raw(value: impl Into<String>) -> Self {
        Key::Raw(value.into())
    }

    /// Parse `"ns/name"` or `"name"` into a structured key.
    ///
    /// Splits on the first `/`; everything after it belongs to the name.
    pub fn parse(input: &str) -> Self {
        match input.split_once('/') {
            Some((ns, name)) if !ns.is_empty() => Key::namespaced(ns, name),
            _ => Key::name(input),
        }
    }

    /// Render as an environment variable name.
    ///
    /// Uppercases, turns dashes into underscores, munges characters illegal
    /// in env-var names, and joins namespace and name with `__`:
    /// `http/port` becomes `HTTP__PORT`.
    #[must_use]
    pub fn to_env_var(&self) -> String {
        match self {
            Key::Raw(s) => s.clone(),
            Key::Ident { namespace, name } => match namespace {
                Some(ns) => format!("{}__{}", munge_env(ns), munge_env(name)),
                None => munge_env(name),
            },
        }
    }

    /// Render as a long CLI flag name (without the leading `--`).
    ///
    /// Lowercases and joins namespace and name with a single dash:
    /// `http/port` becomes `http-port`. No munging beyond case.
    #[must_use]
    pub fn to_cli_arg(&self) -> String {
        match self {
            Key::Raw(s) => s.clone(),
            Key::Ident { namespace, name } => match namespace {
                Some(ns) => format!("{}-{}", ns.to_lowercase(), name.to_lowercase()),
                None => name.to_lowercase(),
            },
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Raw(s) => f.write_str(s),
            Key::Ident { namespace, name } => match namespace {
                Some(ns) => write!(f, "{ns}/{name}"),
                None => f.write_str(name),
            },
        }
    }
}

impl From<&str> for Key {
    fn from(input: &str) -> Self {
        Key::parse(input)
    }
}

// =============================================================================
// Identifier munging
// =============================================================================

/// Escape sequences for identifier characters illegal in env-var names
const MUNGE_TABLE: &[(char, &str)] = &[
    ('?', "_QMARK_"),
    ('!', "_BANG_"),
    ('*', "_STAR_"),
    ('+', "_PLUS_"),
    ('<', "_LT_"),
    ('>', "_GT_"),
    ('=', "_EQ_"),
];

fn munge_env(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for ch in segment.chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            out.extend(ch.to_uppercase());
        } else if ch == '-' {
            out.push('_');
        } else if let Some((_, escape)) = MUNGE_TABLE.iter().find(|(c, _)| *c == ch) {
            out.push_str(escape);
        } else if ch.is_alphanumeric() {
            out.extend(ch.to_uppercase());
        } else {
            out.push('_');
        }
    }
    out
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_var_namespaced() {
        assert_eq!(Key::parse("foo/bar").to_env_var(), "FOO__BAR");
    }

    #[test]
    fn test_env_var_plain() {
        assert_eq!(Key::parse("foo").to_env_var(), "FOO");
    }

    #[test]
    fn test_env_var_dashes_become_underscores() {
        assert_eq!(Key::parse("http-server/max-conns").to_env_var(), "HTTP_SERVER__MAX_CONNS");
    }

    #[test]
    fn test_env_var_raw_passes_through() {
        let key = Key::raw("FOO__BAR");
        assert_eq!(key.to_env_var(), "FOO__BAR");
        // Idempotent on an already-formatted name
        assert_eq!(Key::raw(key.to_env_var()).to_env_var(), "FOO__BAR");
    }

    #[test]
    fn test_env_var_munges_illegal_chars() {
        assert_eq!(Key::parse("debug?").to_env_var(), "DEBUG_QMARK_");
        assert_eq!(Key::parse("reload!").to_env_var(), "RELOAD_BANG_");
    }

    #[test]
    fn test_cli_arg_namespaced() {
        assert_eq!(Key::parse("foo-bar/baz-baq").to_cli_arg(), "foo-bar-baz-baq");
    }

    #[test]
    fn test_cli_arg_plain() {
        assert_eq!(Key::parse("Port").to_cli_arg(), "port");
    }

    #[test]
    fn test_cli_arg_raw_passes_through() {
        assert_eq!(Key::raw("already-a-flag").to_cli_arg(), "already-a-flag");
    }

    #[test]
    fn test_parse_splits_on_first_slash() {
        assert_eq!(
            Key::parse("a/b/c"),
            Key::namespaced("a", "b/c")
        );
    }

    #[test]
    fn test_display_round_trip() {
        let key = Key::parse("http/port");
        assert_eq!(key.to_string(), "http/port");
        assert_eq!(Key::parse(&key.to_string()), key);
    }
}
