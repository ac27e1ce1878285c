//! Password reset session configuration.
//!
//! - `RESET_SESSION_TTL_SECONDS`: lifetime of a reset session (default: 900)
//! - `SESSION_COOKIE_SECURE`: mark the session cookie `Secure` (default: false)
//! - `SESSION_COOKIE_NAME`: cookie carrying the session id (default: `schoolhub_session`)

use std::env;

pub const DEFAULT_SESSION_COOKIE: &str = "schoolhub_session";
pub const DEFAULT_RESET_TTL_SECONDS: u64 = 900;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub cookie_secure: bool,
    pub reset_ttl_seconds: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: DEFAULT_SESSION_COOKIE.to_string(),
            cookie_secure: false,
            reset_ttl_seconds: DEFAULT_RESET_TTL_SECONDS,
        }
    }
}

impl SessionConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            cookie_name: env::var("SESSION_COOKIE_NAME")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SESSION_COOKIE.to_string()),
            cookie_secure: env::var("SESSION_COOKIE_SECURE")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(false),
            reset_ttl_seconds: env::var("RESET_SESSION_TTL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|ttl| *ttl > 0)
                .unwrap_or(DEFAULT_RESET_TTL_SECONDS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SessionConfig::default();
        assert_eq!(config.cookie_name, "schoolhub_session");
        assert_eq!(config.reset_ttl_seconds, 900);
        assert!(!config.cookie_secure);
    }

    #[test]
    fn test_config_clone() {
        let config = SessionConfig::default();
        assert_eq!(config.clone(), config);
    }
}
