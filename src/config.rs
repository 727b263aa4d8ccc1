//! Application configuration loaded from environment variables.
//!
//! # Configuration Hierarchy
//!
//! All configuration is loaded from environment variables with sensible
//! defaults for development, except the Basic-Auth credentials which are
//! required and have no default. In production, configure via environment
//! variables or a `.env` file.
//!
//! # Security Configuration
//!
//! - `BASIC_AUTH_USERNAME` / `BASIC_AUTH_PASSWORD`: caller credentials
//!   (required, no default)
//! - `CORS_ALLOWED_ORIGINS`: Comma-separated list of allowed origins
//!   (default: `*` for dev)
//!
//! # Upstream and Admission Tuning
//!
//! - `EXTERNAL_API_URL`: Registry endpoint (default provided)
//! - `EXTERNAL_API_TIMEOUT`: Outbound call timeout in seconds (default: 30)
//! - `RATE_LIMIT_REQUESTS`: Admissions per client per window (default: 100)
//! - `RATE_LIMIT_WINDOW`: Trailing window length in seconds (default: 3600)

use std::env;
use std::time::Duration;

use crate::error::{AppError, AppResult};

/// Output format for structured logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per line (machine-readable, the production default)
    Json,
    /// Human-readable formatter for local development
    Text,
}

/// Application configuration loaded from environment variables.
///
/// Constructed once at startup and passed by reference through [`crate::state::AppState`];
/// there is no ambient global lookup.
#[derive(Debug, Clone)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Server host address (default: "0.0.0.0")
    pub host: String,

    /// Server port (default: 8000)
    pub port: u16,

    // =========================================================================
    // Basic-Auth Configuration
    // =========================================================================
    /// Expected Basic-Auth username (required, no default)
    pub basic_auth_username: String,

    /// Expected Basic-Auth password (required, no default)
    pub basic_auth_password: String,

    // =========================================================================
    // External Registry Configuration
    // =========================================================================
    /// Base URL of the external medical book registry
    pub external_api_url: String,

    /// Timeout for the single outbound registry call
    pub external_api_timeout: Duration,

    // =========================================================================
    // Rate Limiting Configuration
    // =========================================================================
    /// Maximum admissions per client within the trailing window
    /// Set to 0 to disable rate limiting
    pub rate_limit_requests: u32,

    /// Length of the trailing admission window
    pub rate_limit_window: Duration,

    // =========================================================================
    // Security Configuration
    // =========================================================================
    /// Comma-separated list of allowed CORS origins
    /// Use "*" to allow all origins (not recommended for production)
    pub cors_allowed_origins: Vec<String>,

    /// Maximum request body size in bytes (default: 16KB)
    /// Lookup payloads are tiny; anything larger is abuse
    pub max_request_body_size: usize,

    // =========================================================================
    // Observability Configuration
    // =========================================================================
    /// Log level directive (e.g., "info", "debug", "elmk_gateway=trace")
    pub log_level: String,

    /// Log output format ("json" or "text")
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a required variable is missing or any
    /// value fails to parse (e.g., non-numeric PORT).
    pub fn from_env() -> AppResult<Self> {
        // Load an .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let config = Self {
            // Server
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: Self::parse_env("PORT", 8000)?,

            // Basic-Auth (required)
            basic_auth_username: Self::required_env("BASIC_AUTH_USERNAME")?,
            basic_auth_password: Self::required_env("BASIC_AUTH_PASSWORD")?,

            // External registry
            external_api_url: env::var("EXTERNAL_API_URL")
                .unwrap_or_else(|_| "https://elmk.rospotrebnadzor.ru/registry".to_string()),
            external_api_timeout: Duration::from_secs(Self::parse_env(
                "EXTERNAL_API_TIMEOUT",
                30,
            )?),

            // Rate limiting
            rate_limit_requests: Self::parse_env("RATE_LIMIT_REQUESTS", 100)?,
            rate_limit_window: Duration::from_secs(Self::parse_env("RATE_LIMIT_WINDOW", 3600)?),

            // Security
            cors_allowed_origins: Self::parse_cors_origins(),
            max_request_body_size: Self::parse_env("MAX_REQUEST_BODY_SIZE", 16 * 1024)?,

            // Observability
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            log_format: Self::parse_log_format()?,
        };

        // Validate configuration before returning
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values for consistency and correctness.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if validation fails.
    fn validate(&self) -> AppResult<()> {
        if self.basic_auth_username.is_empty() {
            return Err(AppError::Config(
                "BASIC_AUTH_USERNAME must not be empty".to_string(),
            ));
        }

        if self.basic_auth_password.is_empty() {
            return Err(AppError::Config(
                "BASIC_AUTH_PASSWORD must not be empty".to_string(),
            ));
        }

        if self.external_api_url.is_empty() {
            return Err(AppError::Config(
                "EXTERNAL_API_URL must not be empty".to_string(),
            ));
        }

        if self.external_api_timeout.is_zero() {
            return Err(AppError::Config(
                "EXTERNAL_API_TIMEOUT must be greater than 0".to_string(),
            ));
        }

        // rate_limit_requests == 0 disables limiting, but a zero-length
        // window with limiting enabled would reject nothing coherently
        if self.rate_limit_requests > 0 && self.rate_limit_window.is_zero() {
            return Err(AppError::Config(
                "RATE_LIMIT_WINDOW must be greater than 0".to_string(),
            ));
        }

        if self.max_request_body_size == 0 {
            return Err(AppError::Config(
                "MAX_REQUEST_BODY_SIZE must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Get the full server address for binding.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if rate limiting is enabled.
    pub fn rate_limiting_enabled(&self) -> bool {
        self.rate_limit_requests > 0
    }

    /// Read a required environment variable, rejecting empty values.
    fn required_env(name: &str) -> AppResult<String> {
        env::var(name)
            .ok()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::Config(format!("{name} is required")))
    }

    /// Parse an environment variable into the specified type with a default value.
    fn parse_env<T>(name: &str, default: T) -> AppResult<T>
    where
        T: std::str::FromStr + ToString,
        T::Err: std::fmt::Display,
    {
        match env::var(name) {
            Ok(val) => val
                .parse()
                .map_err(|e| AppError::Config(format!("Invalid {name}: {e}"))),
            Err(_) => Ok(default),
        }
    }

    /// Parse CORS allowed origins from environment variable.
    fn parse_cors_origins() -> Vec<String> {
        env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Parse the log format from `LOG_FORMAT` (default: "json").
    fn parse_log_format() -> AppResult<LogFormat> {
        match env::var("LOG_FORMAT")
            .unwrap_or_else(|_| "json".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "json" => Ok(LogFormat::Json),
            "text" | "plain" => Ok(LogFormat::Text),
            other => Err(AppError::Config(format!(
                "Invalid LOG_FORMAT '{other}': expected 'json' or 'text'"
            ))),
        }
    }
}

/// Default configuration for testing and development.
///
/// Production deployments should use `Config::from_env()` instead; note the
/// placeholder credentials here.
impl Default for Config {
    fn default() -> Self {
        Self {
            // Server
            host: "0.0.0.0".to_string(),
            port: 8000,
            // Basic-Auth
            basic_auth_username: "admin".to_string(),
            basic_auth_password: "changeme".to_string(),
            // External registry
            external_api_url: "https://elmk.rospotrebnadzor.ru/registry".to_string(),
            external_api_timeout: Duration::from_secs(30),
            // Rate limiting
            rate_limit_requests: 100,
            rate_limit_window: Duration::from_secs(3600),
            // Security
            cors_allowed_origins: vec!["*".to_string()],
            max_request_body_size: 16 * 1024,
            // Observability
            log_level: "info".to_string(),
            log_format: LogFormat::Json,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = Config::default();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8000);
        assert_eq!(config.rate_limit_requests, 100);
        assert_eq!(config.rate_limit_window, Duration::from_secs(3600));
        assert_eq!(config.external_api_timeout, Duration::from_secs(30));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_server_addr_format() {
        let config = Config {
            host: "localhost".to_string(),
            port: 8000,
            ..Config::default()
        };

        assert_eq!(config.server_addr(), "localhost:8000");
    }

    #[test]
    fn test_rate_limiting_enabled() {
        let config = Config::default();
        assert!(config.rate_limiting_enabled());

        let config = Config {
            rate_limit_requests: 0,
            ..Config::default()
        };
        assert!(!config.rate_limiting_enabled());
    }

    #[test]
    fn test_validate_empty_username() {
        let config = Config {
            basic_auth_username: String::new(),
            ..Config::default()
        };

        let result = config.validate();
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("BASIC_AUTH_USERNAME")
        );
    }

    #[test]
    fn test_validate_empty_password() {
        let config = Config {
            basic_auth_password: String::new(),
            ..Config::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_timeout() {
        let config = Config {
            external_api_timeout: Duration::ZERO,
            ..Config::default()
        };

        let result = config.validate();
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("EXTERNAL_API_TIMEOUT")
        );
    }

    #[test]
    fn test_validate_zero_window_with_limiting_enabled() {
        let config = Config {
            rate_limit_requests: 10,
            rate_limit_window: Duration::ZERO,
            ..Config::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_window_with_limiting_disabled() {
        let config = Config {
            rate_limit_requests: 0,
            rate_limit_window: Duration::ZERO,
            ..Config::default()
        };

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }
}
