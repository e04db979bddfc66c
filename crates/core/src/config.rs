//! Shared configuration loader for GearUp services
//!
//! Environment-driven configuration with validation and `.env` support. Service
//! settings use the `GEARUP_SERVICE_` prefix and fall back to the conventional
//! unprefixed names (`HOST`, `PORT`, `RUST_LOG`) when the prefixed ones are unset.
//!
//! # Example
//!
//! ```no_run
//! use gearup_core::config::{load_dotenv, ConfigLoader, ServiceConfig};
//!
//! # fn example() -> Result<(), gearup_core::GearupError> {
//! load_dotenv();
//!
//! let service_config = ServiceConfig::from_env()?;
//! service_config.validate()?;
//! # Ok(())
//! # }
//! ```

use crate::error::GearupError;
use crate::observability::LogFormat;
use tracing_subscriber::EnvFilter;

/// Configuration loader trait
///
/// Provides standardized methods for loading and validating configuration from
/// environment variables.
pub trait ConfigLoader: Sized {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` if required variables are missing or a value
    /// cannot be parsed.
    fn from_env() -> Result<Self, GearupError>;

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` if any validation check fails.
    fn validate(&self) -> Result<(), GearupError>;
}

/// Service configuration
///
/// HTTP bind settings and logging for a GearUp service process.
///
/// # Environment Variables
///
/// - `GEARUP_SERVICE_HOST` (optional): Service bind host (default: "0.0.0.0")
/// - `GEARUP_SERVICE_PORT` (optional): Service bind port (default: 5000)
/// - `GEARUP_SERVICE_WORKERS` (optional): Number of worker threads (default: CPU count)
/// - `GEARUP_SERVICE_LOG_LEVEL` (optional): Log level (default: "info")
/// - `GEARUP_SERVICE_LOG_FORMAT` (optional): `json` or `pretty` (default: "json")
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Service bind host
    pub host: String,
    /// Service bind port
    pub port: u16,
    /// Number of worker threads
    pub workers: usize,
    /// Log filter directive, e.g. `info` or `info,actix_web=warn`
    pub log_level: String,
    /// Log output format
    pub log_format: LogFormat,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            workers: num_cpus::get(),
            log_level: "info".to_string(),
            log_format: LogFormat::Json,
        }
    }
}

impl ServiceConfig {
    /// `host:port` string suitable for binding
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl ConfigLoader for ServiceConfig {
    fn from_env() -> Result<Self, GearupError> {
        let defaults = ServiceConfig::default();

        let host = std::env::var("GEARUP_SERVICE_HOST")
            .or_else(|_| std::env::var("HOST"))
            .unwrap_or(defaults.host);

        let port = match std::env::var("GEARUP_SERVICE_PORT") {
            Ok(_) => parse_env_var("GEARUP_SERVICE_PORT", defaults.port)?,
            Err(_) => parse_env_var("PORT", defaults.port)?,
        };

        let workers = parse_env_var("GEARUP_SERVICE_WORKERS", defaults.workers)?;

        let log_level = std::env::var("GEARUP_SERVICE_LOG_LEVEL")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(defaults.log_level);

        let log_format = parse_env_var("GEARUP_SERVICE_LOG_FORMAT", defaults.log_format)?;

        Ok(Self {
            host,
            port,
            workers,
            log_level,
            log_format,
        })
    }

    fn validate(&self) -> Result<(), GearupError> {
        if self.host.trim().is_empty() {
            return Err(GearupError::config(
                "host must not be empty",
                "GEARUP_SERVICE_HOST",
            ));
        }

        if self.port == 0 {
            return Err(GearupError::config(
                "port must be greater than 0",
                "GEARUP_SERVICE_PORT",
            ));
        }

        if self.workers == 0 {
            return Err(GearupError::config(
                "workers must be greater than 0",
                "GEARUP_SERVICE_WORKERS",
            ));
        }

        if let Err(e) = EnvFilter::try_new(&self.log_level) {
            return Err(GearupError::config(
                format!("Invalid log_level '{}': {}", self.log_level, e),
                "GEARUP_SERVICE_LOG_LEVEL",
            ));
        }

        Ok(())
    }
}

/// Parse an environment variable, falling back to `default` when it is unset
///
/// # Errors
///
/// Returns a `ConfigurationError` if the variable is set but cannot be parsed
pub fn parse_env_var<T>(key: &str, default: T) -> Result<T, GearupError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    std::env::var(key)
        .ok()
        .map(|v| {
            v.parse::<T>()
                .map_err(|e| GearupError::config(format!("Failed to parse {}: {}", key, e), key))
        })
        .unwrap_or(Ok(default))
}

/// Load .env file if present
///
/// Missing `.env` files are not an error.
pub fn load_dotenv() {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }
}
