//! Startup validation utilities for configuration values.

use crate::types::{Error, Result};

/// Validate that a string is not empty.
pub fn validate_non_empty(s: &str, field: &str) -> Result<()> {
    if s.trim().is_empty() {
        return Err(Error::config(format!("{} cannot be empty", field)));
    }
    Ok(())
}

/// Validate that a value is positive.
pub fn validate_positive<N: Into<u128>>(n: N, field: &str) -> Result<()> {
    if n.into() == 0 {
        return Err(Error::config(format!("{} must be positive", field)));
    }
    Ok(())
}

/// Validate that a string is an absolute http(s) URL with a host.
pub fn validate_http_url(s: &str, field: &str) -> Result<()> {
    let rest = s
        .strip_prefix("https://")
        .or_else(|| s.strip_prefix("http://"))
        .ok_or_else(|| Error::config(format!("{} must start with http:// or https://", field)))?;
    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    if host.is_empty() {
        return Err(Error::config(format!("{} has no host", field)));
    }
    Ok(())
}

/// Validate a tracing level name.
pub fn validate_log_level(s: &str, field: &str) -> Result<()> {
    match s {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        other => Err(Error::config(format!(
            "{} must be one of trace, debug, info, warn, error (got '{}')",
            field, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty() {
        assert!(validate_non_empty("abc", "token").is_ok());
        assert!(validate_non_empty("  ", "token").is_err());
    }

    #[test]
    fn test_positive() {
        assert!(validate_positive(1u32, "n").is_ok());
        assert!(validate_positive(0u64, "n").is_err());
    }

    #[test]
    fn test_http_url() {
        assert!(validate_http_url("https://api.serpstat.com/v4", "url").is_ok());
        assert!(validate_http_url("http://127.0.0.1:8080", "url").is_ok());
        assert!(validate_http_url("https:///v4", "url").is_err());
        assert!(validate_http_url("api.serpstat.com", "url").is_err());
    }

    #[test]
    fn test_log_level() {
        assert!(validate_log_level("debug", "LOG_LEVEL").is_ok());
        assert!(validate_log_level("verbose", "LOG_LEVEL").is_err());
    }
}
