//! Ratings merger
//!
//! Merge strategy: first occurrence wins. Lists are walked in the given
//! order and records within each list in file order; a record whose
//! [`MergeKey`](super::record::MergeKey) was already seen is dropped.

use super::record::MovieRating;
use std::collections::HashSet;

/// Join rating lists into one deduplicated list, preserving first-seen order
pub fn join_ratings(lists: &[Vec<MovieRating>]) -> Vec<MovieRating> {
    let mut seen = HashSet::new();
    let mut merged = Vec::new();

    for rating in lists.iter().flatten() {
        if seen.insert(rating.merge_key()) {
            merged.push(rating.clone());
        }
    }

    merged
}
