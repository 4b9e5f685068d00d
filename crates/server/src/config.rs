//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SUPABASE_URL` - Base URL of the hosted data store project
//! - `SUPABASE_KEY` - Data store API key
//! - `OPENWEATHER_API_KEY` - OpenWeatherMap API key
//!
//! ## Optional
//! - `RAINCHECK_HOST` - Bind address (default: 127.0.0.1)
//! - `RAINCHECK_PORT` - Listen port (default: 8000)
//! - `RAINCHECK_DEFAULT_CITY` - City used when a request carries no
//!   coordinates (default: Jakarta)
//! - `RAINCHECK_HTTP_TIMEOUT_SECS` - Upstream request timeout (default: 10)
//! - `OPENWEATHER_BASE_URL` - Weather API base URL (default: the public
//!   endpoint; overridable for tests)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

/// Public OpenWeatherMap endpoint used when no override is configured.
const DEFAULT_WEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Raincheck application configuration.
#[derive(Debug, Clone)]
pub struct RaincheckConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Timeout applied to every upstream HTTP call
    pub http_timeout: Duration,
    /// Hosted data store configuration
    pub store: StoreConfig,
    /// Weather API configuration
    pub weather: WeatherConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag (e.g., "production")
    pub sentry_environment: Option<String>,
}

/// Hosted data store (Supabase-style REST) configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct StoreConfig {
    /// Project base URL (the `/rest/v1` prefix is appended by the client)
    pub url: String,
    /// API key, sent as both `apikey` and bearer token
    pub api_key: SecretString,
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("url", &self.url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// Weather API configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct WeatherConfig {
    /// API base URL, e.g. `https://api.openweathermap.org/data/2.5`
    pub base_url: String,
    /// API key appended to every request
    pub api_key: SecretString,
    /// City queried when a request carries no coordinates
    pub default_city: String,
}

impl std::fmt::Debug for WeatherConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("default_city", &self.default_city)
            .finish()
    }
}

impl RaincheckConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    /// Missing upstream credentials fail startup outright rather than
    /// limping along without them.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("RAINCHECK_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("RAINCHECK_HOST".to_owned(), e.to_string()))?;
        let port = get_env_or_default("RAINCHECK_PORT", "8000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("RAINCHECK_PORT".to_owned(), e.to_string()))?;
        let http_timeout_secs = get_env_or_default("RAINCHECK_HTTP_TIMEOUT_SECS", "10")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("RAINCHECK_HTTP_TIMEOUT_SECS".to_owned(), e.to_string())
            })?;

        Ok(Self {
            host,
            port,
            http_timeout: Duration::from_secs(http_timeout_secs),
            store: StoreConfig::from_env()?,
            weather: WeatherConfig::from_env()?,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl StoreConfig {
    /// Load the data store configuration from environment variables.
    ///
    /// Public so the CLI tools can connect without loading the full server
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing or the URL
    /// does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let url = get_required_env("SUPABASE_URL")?;
        validate_base_url("SUPABASE_URL", &url)?;

        Ok(Self {
            url,
            api_key: get_required_env("SUPABASE_KEY").map(SecretString::from)?,
        })
    }
}

impl WeatherConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let base_url = get_env_or_default("OPENWEATHER_BASE_URL", DEFAULT_WEATHER_BASE_URL);
        validate_base_url("OPENWEATHER_BASE_URL", &base_url)?;

        Ok(Self {
            base_url,
            api_key: get_required_env("OPENWEATHER_API_KEY").map(SecretString::from)?,
            default_city: get_env_or_default("RAINCHECK_DEFAULT_CITY", "Jakarta"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_owned()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Validate that a configured value is an absolute http(s) URL.
fn validate_base_url(var_name: &str, value: &str) -> Result<(), ConfigError> {
    let parsed = url::Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_owned(), e.to_string()))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_owned(),
            format!("unsupported scheme '{}'", parsed.scheme()),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config() -> RaincheckConfig {
        RaincheckConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 8000,
            http_timeout: Duration::from_secs(10),
            store: StoreConfig {
                url: "https://project.supabase.co".to_owned(),
                api_key: SecretString::from("store-key"),
            },
            weather: WeatherConfig {
                base_url: DEFAULT_WEATHER_BASE_URL.to_owned(),
                api_key: SecretString::from("weather-key"),
                default_city: "Jakarta".to_owned(),
            },
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    #[test]
    fn test_socket_addr() {
        let config = test_config();
        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 8000);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = test_config();
        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("project.supabase.co"));
        assert!(debug_output.contains("Jakarta"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("store-key"));
        assert!(!debug_output.contains("weather-key"));
    }

    #[test]
    fn test_validate_base_url() {
        assert!(validate_base_url("X", "https://api.example.com/data/2.5").is_ok());
        assert!(validate_base_url("X", "not a url").is_err());
        assert!(validate_base_url("X", "ftp://example.com").is_err());
    }
}
