//! `${VAR}` expansion for configuration strings.

use crate::ConfigError;

/// Expand environment variable references in a string.
///
/// `${VAR}` expands to the value of `VAR` and fails when it is unset.
/// `${VAR:-default}` falls back to `default`. Bare `$VAR` is left alone.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, LookupError> {
        std::env::var(var).map(Some).map_err(|_| LookupError {
            var_name: var.to_owned(),
        })
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{0}}} not set", e.cause.var_name),
    })
}

struct LookupError {
    var_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_simple_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("MD2CF_TEST_SIMPLE", "hello");
        }
        assert_eq!(expand_env("${MD2CF_TEST_SIMPLE}", "f").unwrap(), "hello");
        unsafe {
            std::env::remove_var("MD2CF_TEST_SIMPLE");
        }
    }

    #[test]
    fn test_expand_default_used_when_unset() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("MD2CF_TEST_UNSET");
        }
        assert_eq!(
            expand_env("${MD2CF_TEST_UNSET:-fallback}", "f").unwrap(),
            "fallback"
        );
    }

    #[test]
    fn test_expand_missing_var_names_field() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("MD2CF_TEST_MISSING");
        }
        let err = expand_env("${MD2CF_TEST_MISSING}", "confluence.token").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        let msg = err.to_string();
        assert!(msg.contains("MD2CF_TEST_MISSING"));
        assert!(msg.contains("confluence.token"));
    }

    #[test]
    fn test_expand_embedded_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("MD2CF_TEST_HOST", "acme.atlassian.net");
        }
        assert_eq!(
            expand_env("https://${MD2CF_TEST_HOST}", "f").unwrap(),
            "https://acme.atlassian.net"
        );
        unsafe {
            std::env::remove_var("MD2CF_TEST_HOST");
        }
    }

    #[test]
    fn test_bare_dollar_unchanged() {
        assert_eq!(expand_env("pa$$word", "f").unwrap(), "pa$$word");
        assert_eq!(expand_env("$HOME", "f").unwrap(), "$HOME");
    }
}
