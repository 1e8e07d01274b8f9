//! Sparse numeric vectors.
//!
//! Feature pipelines over text tend to produce vectors with a handful of
//! non-zero entries out of a large feature space. [`SparseVector`] stores only
//! the non-zero `(index, value)` pairs, sorted by feature index; absent
//! indices are implicitly zero.
//!
//! The representation is canonical: pairs are always sorted, duplicate
//! indices merged, and exact zeros dropped, so `PartialEq` compares vectors
//! by value.

use std::collections::BTreeMap;

/// A sparse numeric vector: a sorted mapping from feature index to value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SparseVector {
    pairs: Vec<(usize, f64)>,
}

impl SparseVector {
    /// Create an empty vector (all features zero).
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Build a vector from `(index, value)` pairs.
    ///
    /// Pairs may arrive in any order; duplicate indices are merged by
    /// summation, and entries with an exact zero value are dropped.
    pub fn from_pairs(mut pairs: Vec<(usize, f64)>) -> Self {
        pairs.sort_by_key(|&(index, _)| index);

        let mut merged: Vec<(usize, f64)> = Vec::with_capacity(pairs.len());
        for (index, value) in pairs {
            match merged.last_mut() {
                Some((last, acc)) if *last == index => *acc += value,
                _ => merged.push((index, value)),
            }
        }
        merged.retain(|&(_, value)| value != 0.0);

        Self { pairs: merged }
    }

    /// Value at `index` (zero when the feature is absent).
    pub fn get(&self, index: usize) -> f64 {
        match self.pairs.binary_search_by_key(&index, |&(i, _)| i) {
            Ok(pos) => self.pairs[pos].1,
            Err(_) => 0.0,
        }
    }

    /// Iterate over the non-zero `(index, value)` entries in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.pairs.iter().copied()
    }

    /// Number of non-zero entries.
    pub fn nnz(&self) -> usize {
        self.pairs.len()
    }

    /// Whether every feature is zero.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub(crate) fn pairs(&self) -> &[(usize, f64)] {
        &self.pairs
    }
}

impl From<&[f64]> for SparseVector {
    /// Convert a dense slice, dropping zero components.
    fn from(dense: &[f64]) -> Self {
        Self {
            pairs: dense
                .iter()
                .enumerate()
                .filter(|&(_, &value)| value != 0.0)
                .map(|(index, &value)| (index, value))
                .collect(),
        }
    }
}

/// Component-wise arithmetic mean of a set of vectors.
///
/// Absent features count as zero, so a feature present in only some of the
/// vectors is still averaged over all of them. Returns `None` for an empty
/// set; the mean of zero vectors is undefined.
pub fn mean<'a, I>(vectors: I) -> Option<SparseVector>
where
    I: IntoIterator<Item = &'a SparseVector>,
{
    let mut sums: BTreeMap<usize, f64> = BTreeMap::new();
    let mut count = 0usize;

    for vector in vectors {
        count += 1;
        for (index, value) in vector.iter() {
            *sums.entry(index).or_insert(0.0) += value;
        }
    }

    if count == 0 {
        return None;
    }

    let n = count as f64;
    Some(SparseVector {
        pairs: sums
            .into_iter()
            .map(|(index, sum)| (index, sum / n))
            .filter(|&(_, value)| value != 0.0)
            .collect(),
    })
}
