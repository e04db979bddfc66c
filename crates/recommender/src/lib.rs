//! GearUp Recommender
//!
//! Recommends products to a user from the products held by similar users, where
//! similarity is the Jaccard index of the users' interacted-product sets.
//! Interaction snapshots come from a Firebase Realtime Database.

pub mod config;
pub mod credentials;
pub mod engine;
pub mod error;
pub mod firebase;
pub mod server;
pub mod similarity;
pub mod store;
pub mod types;

pub use config::{FirebaseConfig, RecommenderConfig};
pub use credentials::{ServiceAccountKey, ServiceAccountTokenProvider};
pub use engine::{EngineConfig, RecommendationEngine};
pub use error::{RecommenderError, NOT_FOUND_MESSAGE};
pub use firebase::FirebaseInteractionStore;
pub use server::{configure, AppState, SERVICE_NAME};
pub use similarity::jaccard_similarity;
pub use store::{InMemoryInteractionStore, InteractionStore, StoreError};
pub use types::{InteractionTable, ProductId, ProductSet, Recommendations, UserId};

#[cfg(test)]
mod tests;
