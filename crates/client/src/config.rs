//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `VITRINE_API_URL` - Base URL of the storefront backend
//!
//! ## Optional
//! - `VITRINE_SESSION_FILE` - Path of the durable session file
//!   (default: `.vitrine-session.json` in the working directory)

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Default session file path, relative to the working directory.
const DEFAULT_SESSION_FILE: &str = ".vitrine-session.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the storefront backend.
    pub api_url: Url,
    /// Path of the durable session file (token + identity).
    pub session_file: PathBuf,
}

impl ClientConfig {
    /// Create a configuration directly, bypassing the environment.
    #[must_use]
    pub const fn new(api_url: Url, session_file: PathBuf) -> Self {
        Self {
            api_url,
            session_file,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `VITRINE_API_URL` is missing or not a
    /// valid absolute URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_url = parse_api_url("VITRINE_API_URL", &get_required_env("VITRINE_API_URL")?)?;
        let session_file =
            PathBuf::from(get_env_or_default("VITRINE_SESSION_FILE", DEFAULT_SESSION_FILE));

        Ok(Self {
            api_url,
            session_file,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse and validate a base URL value.
fn parse_api_url(var_name: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;

    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            "must be an absolute http(s) URL".to_string(),
        ));
    }

    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_api_url_valid() {
        let url = parse_api_url("TEST_VAR", "http://localhost:8000").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/");
    }

    #[test]
    fn test_parse_api_url_invalid() {
        let result = parse_api_url("TEST_VAR", "not a url");
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }

    #[test]
    fn test_parse_api_url_cannot_be_base() {
        let result = parse_api_url("TEST_VAR", "mailto:someone@example.com");
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }
}
