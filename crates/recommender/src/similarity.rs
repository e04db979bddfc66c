//! Set-overlap similarity between users

use std::collections::BTreeSet;

/// Jaccard index `|a ∩ b| / |a ∪ b|`
///
/// Returns 0.0 when either set is empty, so two users with no interactions are
/// never considered similar. Neither input is modified.
pub fn jaccard_similarity<T: Ord>(a: &BTreeSet<T>, b: &BTreeSet<T>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;

    intersection as f64 / union as f64
}
