//! User-based Recommendation Engine
//!
//! Recommends products held by "neighbour" users whose Jaccard similarity to the
//! target clears an adaptive threshold.
//!
//! Steps:
//! 1. Score every other user against the target and average the non-zero scores
//! 2. Threshold = max(average * scale, floor)
//! 3. Count, per product the target does not already hold, how many neighbours hold it
//! 4. Rank by neighbour support (descending), ties by product id (ascending)
//! 5. With exactly two users and nothing ranked, fall back to the other user's whole
//!    product set (ascending), owned products included

use crate::error::{RecommenderError, Result};
use crate::similarity::jaccard_similarity;
use crate::types::{InteractionTable, ProductId, ProductSet, Recommendations};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Threshold parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Multiplier applied to the average non-zero similarity (default: 0.5)
    pub threshold_scale: f64,
    /// Lower bound for the threshold (default: 0.05)
    pub min_threshold: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            threshold_scale: 0.5,
            min_threshold: 0.05,
        }
    }
}

/// Similarity statistics gathered over the other users
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeighbourhoodStats {
    /// Users with a non-zero similarity to the target
    pub comparisons: usize,
    pub average_similarity: f64,
    pub threshold: f64,
}

/// Stateless recommendation engine; each call works on its own snapshot
#[derive(Debug, Clone, Default)]
pub struct RecommendationEngine {
    config: EngineConfig,
}

impl RecommendationEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn with_default_config() -> Self {
        Self::new(EngineConfig::default())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Adaptive neighbour threshold for a given average similarity
    pub fn threshold(&self, average_similarity: f64) -> f64 {
        (average_similarity * self.config.threshold_scale).max(self.config.min_threshold)
    }

    /// Recommend products for `target_user` from `table`
    ///
    /// # Errors
    ///
    /// Returns [`RecommenderError::UserOrDataNotFound`] when the table is empty or
    /// does not contain `target_user`.
    pub fn recommend(&self, table: &InteractionTable, target_user: &str) -> Result<Recommendations> {
        let target_products = table
            .products(target_user)
            .ok_or(RecommenderError::UserOrDataNotFound)?;

        // Scores are computed once and reused for neighbour selection
        let mut all_other_products = ProductSet::new();
        let mut scored: Vec<(&ProductSet, f64)> = Vec::with_capacity(table.len());
        let mut total_similarity = 0.0;
        let mut comparisons = 0usize;

        for (user_id, products) in table.iter() {
            if user_id == target_user {
                continue;
            }

            all_other_products.extend(products.iter().cloned());

            let similarity = jaccard_similarity(target_products, products);
            if similarity > 0.0 {
                total_similarity += similarity;
                comparisons += 1;
            }
            scored.push((products, similarity));
        }

        let average_similarity = if comparisons > 0 {
            total_similarity / comparisons as f64
        } else {
            0.0
        };
        let stats = NeighbourhoodStats {
            comparisons,
            average_similarity,
            threshold: self.threshold(average_similarity),
        };

        let mut support: HashMap<&ProductId, usize> = HashMap::new();
        let mut neighbours = 0usize;

        for (products, similarity) in &scored {
            if *similarity < stats.threshold {
                continue;
            }
            neighbours += 1;
            for product_id in products.difference(target_products) {
                *support.entry(product_id).or_insert(0) += 1;
            }
        }

        let mut recommended_products = rank_by_support(support);

        if recommended_products.is_empty() && table.len() == 2 {
            debug!(
                target_user,
                "No neighbour cleared the threshold in a two-user table, falling back"
            );
            recommended_products = all_other_products.into_iter().collect();
        }

        debug!(
            target_user,
            users = table.len(),
            comparisons = stats.comparisons,
            average_similarity = stats.average_similarity,
            threshold = stats.threshold,
            neighbours,
            recommended = recommended_products.len(),
            "Generated recommendations"
        );

        Ok(Recommendations {
            recommended_products,
        })
    }
}

fn rank_by_support(support: HashMap<&ProductId, usize>) -> Vec<ProductId> {
    let mut ranked: Vec<(&ProductId, usize)> = support.into_iter().collect();
    ranked.sort_by(|(a_id, a_count), (b_id, b_count)| {
        b_count.cmp(a_count).then_with(|| a_id.cmp(b_id))
    });
    ranked
        .into_iter()
        .map(|(product_id, _)| product_id.clone())
        .collect()
}
