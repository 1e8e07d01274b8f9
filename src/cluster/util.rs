//! Random sampling helpers for centroid initialization.

use rand::Rng;

/// Uniform integer source used to pick initial centroids.
///
/// The engine only ever asks for one index at a time and tracks
/// already-chosen indices itself when sampling without replacement, so
/// implementations need no state beyond their own randomness.
pub trait RandomSource {
    /// Return a uniformly distributed index in `[0, bound)`.
    fn next_index(&mut self, bound: usize) -> usize;
}

/// Adapter exposing any `rand` RNG as a [`RandomSource`].
pub struct RngSource<R>(pub R);

impl<R: Rng> RandomSource for RngSource<R> {
    fn next_index(&mut self, bound: usize) -> usize {
        self.0.random_range(0..bound)
    }
}

/// Draw `k` pairwise-distinct indices in `[0, bound)`.
///
/// Repeated draws are rejected, so the source may be consulted more than `k`
/// times. Requires `k <= bound`.
pub(crate) fn sample_distinct(source: &mut dyn RandomSource, k: usize, bound: usize) -> Vec<usize> {
    debug_assert!(k <= bound);

    let mut chosen: Vec<usize> = Vec::with_capacity(k);
    while chosen.len() < k {
        let index = source.next_index(bound);
        if !chosen.contains(&index) {
            chosen.push(index);
        }
    }
    chosen
}
