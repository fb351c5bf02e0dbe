use tracing::debug;

/// Resolve a secret value. A value starting with '$' names an environment
/// variable; if that variable is unset the literal is kept.
pub fn resolve_credential(value: &str) -> String {
    if let Some(var_name) = value.strip_prefix('$') {
        match std::env::var(var_name) {
            Ok(resolved) => {
                debug!(var = %var_name, "Resolved credential from environment");
                resolved
            }
            Err(_) => {
                debug!(var = %var_name, "Environment variable not set, using literal");
                value.to_string()
            }
        }
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_value() {
        assert_eq!(resolve_credential("abc123"), "abc123");
    }

    #[test]
    fn test_env_reference() {
        std::env::set_var("SITEWARDEN_TEST_INDEX_KEY", "from-env");
        assert_eq!(resolve_credential("$SITEWARDEN_TEST_INDEX_KEY"), "from-env");
    }

    #[test]
    fn test_missing_env_keeps_literal() {
        assert_eq!(
            resolve_credential("$SITEWARDEN_TEST_DEFINITELY_UNSET"),
            "$SITEWARDEN_TEST_DEFINITELY_UNSET"
        );
    }
}
