//! Distance metrics over sparse vectors.
//!
//! The clustering engine takes its metric as a collaborator, so anything
//! implementing [`Metric`] plugs in. Implementations here walk the two
//! sorted pair lists with a single merge pass; features absent from one
//! vector contribute a zero on that side.

use crate::vector::SparseVector;
use std::cmp::Ordering;

/// Distance function over two sparse vectors.
///
/// Implementations must return a non-negative value with
/// `distance(x, x) == 0`. Symmetry and the triangle inequality are
/// recommended but not required by the clustering code in this crate.
pub trait Metric {
    /// Distance between `a` and `b`.
    fn distance(&self, a: &SparseVector, b: &SparseVector) -> f64;
}

/// Euclidean (L2) distance.
#[derive(Clone, Copy, Debug, Default)]
pub struct Euclidean;

impl Metric for Euclidean {
    fn distance(&self, a: &SparseVector, b: &SparseVector) -> f64 {
        merge_fold(a, b, |acc, x, y| {
            let d = x - y;
            acc + d * d
        })
        .sqrt()
    }
}

/// Manhattan (L1) distance.
#[derive(Clone, Copy, Debug, Default)]
pub struct Manhattan;

impl Metric for Manhattan {
    fn distance(&self, a: &SparseVector, b: &SparseVector) -> f64 {
        merge_fold(a, b, |acc, x, y| acc + (x - y).abs())
    }
}

/// Fold `f` over the union of feature indices of `a` and `b`.
fn merge_fold(a: &SparseVector, b: &SparseVector, mut f: impl FnMut(f64, f64, f64) -> f64) -> f64 {
    let pa = a.pairs();
    let pb = b.pairs();

    let mut acc = 0.0;
    let (mut i, mut j) = (0, 0);
    while i < pa.len() && j < pb.len() {
        let (ia, va) = pa[i];
        let (ib, vb) = pb[j];
        match ia.cmp(&ib) {
            Ordering::Less => {
                acc = f(acc, va, 0.0);
                i += 1;
            }
            Ordering::Greater => {
                acc = f(acc, 0.0, vb);
                j += 1;
            }
            Ordering::Equal => {
                acc = f(acc, va, vb);
                i += 1;
                j += 1;
            }
        }
    }
    for &(_, va) in &pa[i..] {
        acc = f(acc, va, 0.0);
    }
    for &(_, vb) in &pb[j..] {
        acc = f(acc, 0.0, vb);
    }
    acc
}
