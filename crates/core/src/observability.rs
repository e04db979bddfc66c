//! Structured logging setup
//!
//! Installs the global `tracing` subscriber. Services call [`init_logging`] once at
//! start-up; everything else logs through the `tracing` macros.

use crate::error::GearupError;
use std::fmt;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per line (production)
    Json,
    /// Human-readable multi-line output (local development)
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" | "text" => Ok(LogFormat::Pretty),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Json => write!(f, "json"),
            LogFormat::Pretty => write!(f, "pretty"),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub service_name: String,
    /// Filter directive, e.g. `info` or `gearup_recommender=debug,info`
    pub level: String,
    pub format: LogFormat,
}

impl LogConfig {
    pub fn new(service_name: impl Into<String>, level: impl Into<String>, format: LogFormat) -> Self {
        Self {
            service_name: service_name.into(),
            level: level.into(),
            format,
        }
    }

    fn env_filter(&self) -> Result<EnvFilter, GearupError> {
        EnvFilter::try_new(&self.level).map_err(|e| {
            GearupError::config(
                format!("Invalid log filter '{}': {}", self.level, e),
                "GEARUP_SERVICE_LOG_LEVEL",
            )
        })
    }
}

/// Initialize the global tracing subscriber
///
/// # Errors
///
/// Returns an error if the filter directive is invalid or a global subscriber
/// has already been installed.
pub fn init_logging(config: &LogConfig) -> Result<(), GearupError> {
    let filter = config.env_filter()?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };

    result.map_err(|e| GearupError::ObservabilityError(e.to_string()))?;

    tracing::info!(
        service = %config.service_name,
        format = %config.format,
        "Logging initialized"
    );

    Ok(())
}
