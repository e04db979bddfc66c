//! Recommendation engine scenarios and invariants

use crate::engine::{EngineConfig, RecommendationEngine};
use crate::error::{RecommenderError, NOT_FOUND_MESSAGE};
use crate::types::InteractionTable;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn engine() -> RecommendationEngine {
    RecommendationEngine::with_default_config()
}

fn recommend(table: &InteractionTable, user: &str) -> Vec<String> {
    engine().recommend(table, user).unwrap().recommended_products
}

#[test]
fn test_neighbour_products_are_recommended() {
    // similarity(u1, u2) = 2/3, threshold = max(1/3, 0.05)
    let table = InteractionTable::new()
        .with_user("u1", ["p1", "p2"])
        .with_user("u2", ["p1", "p2", "p3"]);

    assert_eq!(recommend(&table, "u1"), vec!["p3"]);
}

#[test]
fn test_two_user_fallback_for_disjoint_users() {
    let table = InteractionTable::new()
        .with_user("u1", ["p1"])
        .with_user("u2", ["p9"]);

    assert_eq!(recommend(&table, "u1"), vec!["p9"]);
}

#[test]
fn test_unknown_user_is_not_found() {
    let table = InteractionTable::new().with_user("u1", ["p1"]);

    let err = engine().recommend(&table, "ghost").unwrap_err();
    assert!(matches!(err, RecommenderError::UserOrDataNotFound));
    assert_eq!(err.to_string(), NOT_FOUND_MESSAGE);
}

#[test]
fn test_empty_table_is_not_found() {
    let err = engine()
        .recommend(&InteractionTable::new(), "u1")
        .unwrap_err();
    assert!(matches!(err, RecommenderError::UserOrDataNotFound));
}

#[test]
fn test_no_fallback_with_three_users() {
    let table = InteractionTable::new()
        .with_user("u1", ["p1"])
        .with_user("u2", ["p2"])
        .with_user("u3", ["p3"]);

    assert!(recommend(&table, "u1").is_empty());
}

#[test]
fn test_single_user_table_yields_empty_list() {
    let table = InteractionTable::new().with_user("u1", ["p1"]);
    assert!(recommend(&table, "u1").is_empty());
}

#[test]
fn test_ranking_by_neighbour_support() {
    // All three neighbours share p1 with the target; p4 is held by all of them,
    // p5 by two, p6 by one.
    let table = InteractionTable::new()
        .with_user("target", ["p1", "p2"])
        .with_user("a", ["p1", "p2", "p4", "p5", "p6"])
        .with_user("b", ["p1", "p4", "p5"])
        .with_user("c", ["p1", "p2", "p4"]);

    assert_eq!(recommend(&table, "target"), vec!["p4", "p5", "p6"]);
}

#[test]
fn test_ties_are_ordered_by_product_id() {
    let table = InteractionTable::new()
        .with_user("target", ["p1"])
        .with_user("a", ["p1", "zeta", "alpha", "mid"]);

    assert_eq!(recommend(&table, "target"), vec!["alpha", "mid", "zeta"]);
}

#[test]
fn test_low_similarity_users_are_filtered_out() {
    // close: 2/3; far: 1/10 (non-zero, so it lowers the average)
    // average = (0.667 + 0.1) / 2 = 0.383, threshold = 0.192 -> far is excluded
    let far_products: Vec<String> = std::iter::once("p1".to_string())
        .chain((0..8).map(|i| format!("far{}", i)))
        .collect();
    let table = InteractionTable::new()
        .with_user("target", ["p1", "p2"])
        .with_user("close", ["p1", "p2", "near"])
        .with_user("far", far_products);

    assert_eq!(recommend(&table, "target"), vec!["near"]);
}

#[test]
fn test_threshold_floor_excludes_tiny_overlaps() {
    // Only non-zero similarity is 1/21 < 0.05, so the floor applies and nobody qualifies
    let big: Vec<String> = std::iter::once("p1".to_string())
        .chain((0..20).map(|i| format!("x{}", i)))
        .collect();
    let table = InteractionTable::new()
        .with_user("target", ["p1"])
        .with_user("big", big)
        .with_user("other", ["q1"]);

    assert!(recommend(&table, "target").is_empty());
}

#[test]
fn test_two_user_fallback_includes_owned_products() {
    // Neighbour is a strict subset of the target; the fallback still returns its whole set
    let table = InteractionTable::new()
        .with_user("u1", ["p1", "p2"])
        .with_user("u2", ["p1"]);

    assert_eq!(recommend(&table, "u1"), vec!["p1"]);
}

#[test]
fn test_two_user_fallback_below_floor() {
    // similarity 1/21 sits below the 0.05 floor; the fallback returns all of u2's products
    let u2: Vec<String> = std::iter::once("p1".to_string())
        .chain((0..20).map(|i| format!("x{:02}", i)))
        .collect();
    let table = InteractionTable::new()
        .with_user("u1", ["p1"])
        .with_user("u2", u2);

    let recommended = recommend(&table, "u1");
    assert_eq!(recommended.len(), 21);
    assert_eq!(recommended.first().map(String::as_str), Some("p1"));
    assert_eq!(recommended.last().map(String::as_str), Some("x19"));
}

#[test]
fn test_target_with_no_products() {
    let table = InteractionTable::new()
        .with_user("empty", Vec::<String>::new())
        .with_user("a", ["p1"])
        .with_user("b", ["p2"]);

    assert!(recommend(&table, "empty").is_empty());
}

#[test]
fn test_identifiers_are_exact_match() {
    let table = InteractionTable::new()
        .with_user("User1", ["p1"])
        .with_user("user1", ["p1", "P1"]);

    assert_eq!(recommend(&table, "User1"), vec!["P1"]);
}

#[test]
fn test_custom_threshold_config() {
    let table = InteractionTable::new()
        .with_user("target", ["p1", "p2"])
        .with_user("a", ["p1", "p2", "p3"])
        .with_user("b", ["p1", "p4", "p5"]);

    // Default: average = (2/3 + 1/4) / 2 = 0.458, threshold = 0.229 -> both qualify
    assert_eq!(recommend(&table, "target"), vec!["p3", "p4", "p5"]);

    // A floor of 0.5 keeps only the closest neighbour
    let strict = RecommendationEngine::new(EngineConfig {
        threshold_scale: 0.5,
        min_threshold: 0.5,
    });
    let recommended = strict.recommend(&table, "target").unwrap().recommended_products;
    assert_eq!(recommended, vec!["p3"]);
}

/// Seeded random tables for invariant checks
fn generated_tables() -> Vec<InteractionTable> {
    let mut rng = StdRng::seed_from_u64(42);

    (0..50)
        .map(|_| {
            let users = rng.gen_range(2..8);
            let mut table = InteractionTable::new();
            for u in 0..users {
                let count = rng.gen_range(0..6);
                let products: Vec<String> = (0..count)
                    .map(|_| format!("p{}", rng.gen_range(0..10)))
                    .collect();
                table.insert(format!("u{}", u), products);
            }
            table
        })
        .collect()
}

#[test]
fn test_never_recommends_owned_products() {
    // Two-user tables may take the fallback, which returns the other set unfiltered
    for table in generated_tables().into_iter().filter(|t| t.len() > 2) {
        for (user, owned) in table.iter() {
            for product in recommend(&table, user) {
                assert!(!owned.contains(&product), "{} already holds {}", user, product);
            }
        }
    }
}

#[test]
fn test_no_duplicate_recommendations() {
    for table in generated_tables() {
        for (user, _) in table.iter() {
            let recommended = recommend(&table, user);
            let unique: std::collections::HashSet<_> = recommended.iter().collect();
            assert_eq!(unique.len(), recommended.len());
        }
    }
}

#[test]
fn test_threshold_never_below_floor() {
    let engine = engine();
    for average in [0.0, 0.01, 0.05, 0.099, 0.1, 0.5, 1.0] {
        assert!(engine.threshold(average) >= 0.05);
    }
}
