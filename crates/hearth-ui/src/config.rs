//! Client configuration: API base URL and deployment environment.
//!
//! # Design
//! - `from_env` is a thin wrapper over `from_values` so parsing is testable
//!   without touching process state.
//! - On `wasm32` there is no process environment; defaults apply.

use crate::error::ConfigError;

/// Environment variable holding the API base URL.
pub const API_URL_ENV: &str = "HEARTH_API_URL";
/// Environment variable holding the deployment environment name.
pub const ENVIRONMENT_ENV: &str = "HEARTH_ENV";
/// Base URL used when none is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Deployment environment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Environment {
    /// Production build served over HTTPS.
    Production,
    /// Local development.
    #[default]
    Development,
    /// Automated tests.
    Test,
}

impl Environment {
    /// Parse an environment name (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnvironment`] for unknown names.
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "development" | "dev" => Ok(Self::Development),
            "test" => Ok(Self::Test),
            _ => Err(ConfigError::InvalidEnvironment {
                value: value.to_string(),
            }),
        }
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub const fn secure_cookies(self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Settings shared by the request routines and the session store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL without trailing slash.
    pub api_base_url: String,
    /// Deployment environment.
    pub environment: Environment,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            environment: Environment::default(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from `HEARTH_API_URL` and `HEARTH_ENV`.
    ///
    /// # Errors
    ///
    /// Returns an error when either variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_values(
            std::env::var(API_URL_ENV).ok().as_deref(),
            std::env::var(ENVIRONMENT_ENV).ok().as_deref(),
        )
    }

    /// Build configuration from optional raw values, applying defaults.
    ///
    /// # Errors
    ///
    /// Returns an error when the URL has no scheme or the environment is unknown.
    pub fn from_values(
        api_url: Option<&str>,
        environment: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let api_base_url = match api_url.map(str::trim).filter(|url| !url.is_empty()) {
            Some(url) if url.starts_with("http://") || url.starts_with("https://") => {
                url.trim_end_matches('/').to_string()
            }
            Some(url) => {
                return Err(ConfigError::InvalidBaseUrl {
                    value: url.to_string(),
                });
            }
            None => DEFAULT_API_URL.to_string(),
        };
        let environment = environment
            .filter(|value| !value.trim().is_empty())
            .map(Environment::parse)
            .transpose()?
            .unwrap_or_default();
        Ok(Self {
            api_base_url,
            environment,
        })
    }

    /// Join `path` onto the base URL with exactly one separator.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url, path.trim_start_matches('/'))
    }
}
