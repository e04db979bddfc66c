//! # GearUp Core
//!
//! Shared plumbing for GearUp services.
//!
//! ## Modules
//!
//! - `config`: Environment configuration loading and validation
//! - `error`: Error types and handling
//! - `health`: Liveness and readiness payloads
//! - `observability`: Structured logging setup

pub mod config;
pub mod error;
pub mod health;
pub mod observability;

pub use config::{load_dotenv, parse_env_var, ConfigLoader, ServiceConfig};
pub use error::GearupError;
pub use health::{AggregatedHealth, ComponentHealth, HealthStatus, SimpleHealth};
pub use observability::{init_logging, LogConfig, LogFormat};

/// Result type alias for GearUp core operations
pub type Result<T> = std::result::Result<T, GearupError>;
