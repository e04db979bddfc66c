//! Interaction store collaborators
//!
//! The engine never talks to a database itself; request handlers fetch a fresh
//! [`InteractionTable`] from an [`InteractionStore`] and hand it over.

use crate::types::InteractionTable;
use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Interaction store request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Interaction store returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode interaction data: {0}")]
    Decode(String),

    #[error("Credential error: {0}")]
    Credentials(String),
}

/// Source of interaction snapshots
#[async_trait]
pub trait InteractionStore: Send + Sync {
    /// Read every user's interacted products
    async fn fetch_interactions(&self) -> Result<InteractionTable, StoreError>;

    /// Lightweight reachability probe used by the readiness endpoint
    async fn ping(&self) -> Result<(), StoreError> {
        self.fetch_interactions().await.map(|_| ())
    }

    /// Component name reported in health payloads
    fn name(&self) -> &str;
}

/// Store backed by a table held in memory
///
/// Used for local runs and tests.
#[derive(Debug, Default)]
pub struct InMemoryInteractionStore {
    table: RwLock<InteractionTable>,
}

impl InMemoryInteractionStore {
    pub fn new(table: InteractionTable) -> Self {
        Self {
            table: RwLock::new(table),
        }
    }

    /// Swap in a new snapshot; requests already in flight keep their copy
    pub async fn replace(&self, table: InteractionTable) {
        *self.table.write().await = table;
    }
}

#[async_trait]
impl InteractionStore for InMemoryInteractionStore {
    async fn fetch_interactions(&self) -> Result<InteractionTable, StoreError> {
        Ok(self.table.read().await.clone())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}
