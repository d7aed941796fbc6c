//! Random sampling without replacement over a candidate pool.
//!
//! Indices are drawn one at a time from `0..pool_size`; a draw that hits an index already taken is
//! repeated. The order of the returned indices is the draw order, so index `i` of the result is the
//! candidate assigned to synapse slot `i`. With a seeded generator the assignment is reproducible.

use super::error::{NetworkError, Result};
use fxhash::FxHashSet;
use rand::Rng;

/// Draws `amount` distinct indices from `0..pool_size`.
pub fn sample_without_replacement<R: Rng>(
    rng: &mut R,
    pool_size: usize,
    amount: usize,
) -> Result<Vec<usize>> {
    if amount > pool_size {
        return Err(NetworkError::InsufficientCandidates {
            required: amount,
            available: pool_size,
        });
    }

    let mut used = FxHashSet::default();
    let mut sample = Vec::with_capacity(amount);

    while sample.len() < amount {
        let index = rng.random_range(0..pool_size);
        if used.insert(index) {
            sample.push(index);
        }
    }

    Ok(sample)
}
