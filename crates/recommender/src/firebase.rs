//! Firebase Realtime Database interaction store
//!
//! Reads the interactions node over the REST API (`GET <database>/<path>.json`)
//! authenticated with a service-account access token.

use crate::config::FirebaseConfig;
use crate::credentials::{ServiceAccountKey, ServiceAccountTokenProvider};
use crate::store::{InteractionStore, StoreError};
use crate::types::InteractionTable;
use async_trait::async_trait;
use gearup_core::{ConfigLoader, GearupError};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

/// Interaction store reading a Realtime Database node
#[derive(Debug)]
pub struct FirebaseInteractionStore {
    http_client: reqwest::Client,
    node_url: String,
    token_provider: Option<Arc<ServiceAccountTokenProvider>>,
}

impl FirebaseInteractionStore {
    /// Build a store for `config`; `token_provider` is `None` for unauthenticated
    /// databases such as the local emulator
    pub fn new(
        config: &FirebaseConfig,
        http_client: reqwest::Client,
        token_provider: Option<Arc<ServiceAccountTokenProvider>>,
    ) -> Self {
        Self {
            http_client,
            node_url: node_url(&config.database_url, &config.interactions_path),
            token_provider,
        }
    }

    /// Build a store from configuration, loading credentials from the environment
    /// unless the database is configured as anonymous
    pub fn from_config(config: &FirebaseConfig) -> Result<Self, GearupError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| GearupError::InternalError(format!("Failed to build HTTP client: {}", e)))?;

        let token_provider = if config.anonymous {
            None
        } else {
            let key = ServiceAccountKey::from_env()?;
            key.validate()?;
            Some(Arc::new(ServiceAccountTokenProvider::new(
                key,
                http_client.clone(),
            )?))
        };

        Ok(Self::new(config, http_client, token_provider))
    }

    pub fn node_url(&self) -> &str {
        &self.node_url
    }

    async fn get(&self, query: &[(&str, &str)]) -> Result<reqwest::Response, StoreError> {
        let mut request = self.http_client.get(&self.node_url).query(query);
        if let Some(provider) = &self.token_provider {
            request = request.bearer_auth(provider.access_token().await?);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(
                status = status.as_u16(),
                url = %self.node_url,
                "Realtime Database request failed"
            );
            return Err(StoreError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl InteractionStore for FirebaseInteractionStore {
    async fn fetch_interactions(&self) -> Result<InteractionTable, StoreError> {
        let payload: serde_json::Value = self
            .get(&[])
            .await?
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;

        let table = InteractionTable::from_firebase_value(payload).map_err(StoreError::Decode)?;
        debug!(users = table.len(), "Fetched interaction snapshot");
        Ok(table)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        // Shallow reads return only the top-level keys
        self.get(&[("shallow", "true")]).await.map(|_| ())
    }

    fn name(&self) -> &str {
        "firebase"
    }
}

fn node_url(database_url: &str, path: &str) -> String {
    format!(
        "{}/{}.json",
        database_url.trim_end_matches('/'),
        path.trim_matches('/')
    )
}
