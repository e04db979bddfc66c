//! Health check types for GearUp services
//!
//! Services report a liveness payload on `/health` and an aggregated readiness
//! payload on `/ready` built from per-dependency [`ComponentHealth`] results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Health status levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// All systems operational
    Healthy,
    /// Some non-critical components failing
    Degraded,
    /// Critical components failing
    Unhealthy,
}

impl HealthStatus {
    /// Check if status is acceptable for serving traffic
    pub fn is_ready(&self) -> bool {
        matches!(self, HealthStatus::Healthy | HealthStatus::Degraded)
    }

    /// Get HTTP status code for this health status
    pub fn http_status_code(&self) -> u16 {
        match self {
            HealthStatus::Healthy => 200,
            HealthStatus::Degraded => 200,
            HealthStatus::Unhealthy => 503,
        }
    }
}

/// Health check result for a single component
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    /// Component name (e.g., "firebase")
    pub name: String,
    pub status: HealthStatus,
    /// Check latency in milliseconds
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Whether this component is critical for service operation
    pub critical: bool,
}

impl ComponentHealth {
    pub fn healthy(name: impl Into<String>, latency_ms: u64, critical: bool) -> Self {
        Self {
            name: name.into(),
            status: HealthStatus::Healthy,
            latency_ms,
            message: None,
            critical,
        }
    }

    pub fn unhealthy(
        name: impl Into<String>,
        latency_ms: u64,
        critical: bool,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            status: HealthStatus::Unhealthy,
            latency_ms,
            message: Some(message.into()),
            critical,
        }
    }
}

/// Aggregated health status for the entire service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatedHealth {
    pub status: HealthStatus,
    pub components: Vec<ComponentHealth>,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    /// Total time to complete all health checks (ms)
    pub total_latency_ms: u64,
}

impl AggregatedHealth {
    /// Determine overall status from component health checks
    pub fn from_components(
        components: Vec<ComponentHealth>,
        version: impl Into<String>,
        total_latency_ms: u64,
    ) -> Self {
        let status = if components
            .iter()
            .any(|c| c.critical && c.status == HealthStatus::Unhealthy)
        {
            HealthStatus::Unhealthy
        } else if components.iter().any(|c| c.status != HealthStatus::Healthy) {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        };

        Self {
            status,
            components,
            version: version.into(),
            timestamp: Utc::now(),
            total_latency_ms,
        }
    }

    pub fn http_status_code(&self) -> u16 {
        self.status.http_status_code()
    }

    pub fn is_ready(&self) -> bool {
        self.status.is_ready()
    }
}

/// Simple liveness response for the /health endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimpleHealth {
    pub status: HealthStatus,
    pub service: String,
    pub version: String,
}

impl SimpleHealth {
    pub fn healthy(service: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Healthy,
            service: service.into(),
            version: version.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_critical_failure_is_unhealthy() {
        let health = AggregatedHealth::from_components(
            vec![
                ComponentHealth::healthy("cache", 1, false),
                ComponentHealth::unhealthy("firebase", 2000, true, "timed out"),
            ],
            "0.1.0",
            2001,
        );
        assert_eq!(health.status, HealthStatus::Unhealthy);
        assert_eq!(health.http_status_code(), 503);
        assert!(!health.is_ready());
    }

    #[test]
    fn test_non_critical_failure_is_degraded() {
        let health = AggregatedHealth::from_components(
            vec![
                ComponentHealth::healthy("firebase", 12, true),
                ComponentHealth::unhealthy("cache", 3, false, "refused"),
            ],
            "0.1.0",
            15,
        );
        assert_eq!(health.status, HealthStatus::Degraded);
        assert!(health.is_ready());
    }

    #[test]
    fn test_simple_health_serialization() {
        let json = serde_json::to_value(SimpleHealth::healthy("recommender-service", "0.1.0"))
            .unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["service"], "recommender-service");
    }
}
