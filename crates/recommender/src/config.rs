//! Recommender service configuration
//!
//! Layered as defaults < `config/recommender.{toml,yaml,json}` < environment
//! variables prefixed `RECOMMENDER__` (e.g. `RECOMMENDER__ENGINE__MIN_THRESHOLD`).
//! `FIREBASE_DATABASE_URL` overrides `firebase.database_url`.

use crate::engine::EngineConfig;
use config::{Config, Environment, File, Source};
use gearup_core::{ConfigLoader, GearupError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use url::Url;

pub const DEFAULT_CONFIG_FILE: &str = "config/recommender";
pub const DATABASE_URL_ENV: &str = "FIREBASE_DATABASE_URL";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RecommenderConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub firebase: FirebaseConfig,
}

/// Realtime Database settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FirebaseConfig {
    /// Database root, e.g. `https://<project>-default-rtdb.<region>.firebasedatabase.app`
    pub database_url: String,
    /// Node holding `{user_id: {product_id: ...}}`
    pub interactions_path: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
    /// Skip service-account authentication (emulator, open rules)
    pub anonymous: bool,
}

impl Default for FirebaseConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            interactions_path: "user_interactions".to_string(),
            timeout_ms: 10_000,
            anonymous: false,
        }
    }
}

fn config_error(e: config::ConfigError) -> GearupError {
    GearupError::ConfigurationError {
        message: e.to_string(),
        key: None,
    }
}

impl RecommenderConfig {
    /// Build the configuration from an explicit file source and variable map
    pub fn from_sources<S>(file: S, vars: HashMap<String, String>) -> Result<Self, GearupError>
    where
        S: Source + Send + Sync + 'static,
    {
        let engine = EngineConfig::default();
        let firebase = FirebaseConfig::default();
        let database_url_override = vars.get(DATABASE_URL_ENV).cloned();

        let settings = Config::builder()
            .set_default("engine.threshold_scale", engine.threshold_scale)
            .and_then(|b| b.set_default("engine.min_threshold", engine.min_threshold))
            .and_then(|b| b.set_default("firebase.database_url", firebase.database_url))
            .and_then(|b| b.set_default("firebase.interactions_path", firebase.interactions_path))
            .and_then(|b| b.set_default("firebase.timeout_ms", firebase.timeout_ms))
            .and_then(|b| b.set_default("firebase.anonymous", firebase.anonymous))
            .map_err(config_error)?
            .add_source(file)
            .add_source(
                Environment::with_prefix("RECOMMENDER")
                    .separator("__")
                    .try_parsing(true)
                    .source(Some(vars)),
            )
            .set_override_option("firebase.database_url", database_url_override)
            .map_err(config_error)?
            .build()
            .map_err(config_error)?;

        settings.try_deserialize().map_err(config_error)
    }
}

impl ConfigLoader for RecommenderConfig {
    fn from_env() -> Result<Self, GearupError> {
        Self::from_sources(
            File::with_name(DEFAULT_CONFIG_FILE).required(false),
            std::env::vars().collect(),
        )
    }

    fn validate(&self) -> Result<(), GearupError> {
        let scale = self.engine.threshold_scale;
        if scale.is_nan() || scale <= 0.0 {
            return Err(GearupError::config(
                "engine.threshold_scale must be greater than 0",
                "RECOMMENDER__ENGINE__THRESHOLD_SCALE",
            ));
        }

        let floor = self.engine.min_threshold;
        if floor.is_nan() || floor <= 0.0 || floor > 1.0 {
            return Err(GearupError::config(
                format!(
                    "engine.min_threshold must be in (0, 1], got {}",
                    floor
                ),
                "RECOMMENDER__ENGINE__MIN_THRESHOLD",
            ));
        }

        if self.firebase.database_url.trim().is_empty() {
            return Err(GearupError::config(
                format!("{} must be set", DATABASE_URL_ENV),
                DATABASE_URL_ENV,
            ));
        }

        let url = Url::parse(&self.firebase.database_url).map_err(|e| {
            GearupError::config(format!("Invalid {}: {}", DATABASE_URL_ENV, e), DATABASE_URL_ENV)
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(GearupError::config(
                format!("{} must use http or https", DATABASE_URL_ENV),
                DATABASE_URL_ENV,
            ));
        }

        if self.firebase.interactions_path.trim_matches('/').is_empty() {
            return Err(GearupError::config(
                "firebase.interactions_path must not be empty",
                "RECOMMENDER__FIREBASE__INTERACTIONS_PATH",
            ));
        }

        if self.firebase.timeout_ms == 0 {
            return Err(GearupError::config(
                "firebase.timeout_ms must be greater than 0",
                "RECOMMENDER__FIREBASE__TIMEOUT_MS",
            ));
        }

        Ok(())
    }
}
