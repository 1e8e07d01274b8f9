//! Sparse partitional clustering.
//!
//! `glom` is a small, pure-Rust K-means implementation for sparse feature
//! vectors — mappings from feature index to value where absent indices are
//! implicitly zero, the kind a text feature pipeline produces.
//!
//! The primary public API is under [`cluster`], which provides:
//! - K-means over [`SparseVector`] data with a pluggable distance [`Metric`]
//! - explicit empty-cluster handling ([`EmptyClusterPolicy`])
//! - per-engine convergence thresholds and seeded, reproducible runs
//!
//! ```rust
//! use glom::{Clustering, Kmeans, SparseVector};
//!
//! let data: Vec<SparseVector> = [[0.0, 0.0], [0.1, 0.1], [10.0, 10.0], [10.1, 10.1]]
//!     .iter()
//!     .map(|p| SparseVector::from(&p[..]))
//!     .collect();
//!
//! let labels = Kmeans::new(2).unwrap().with_seed(42).fit_predict(&data).unwrap();
//! assert_eq!(labels[0], labels[1]);  // First two together
//! assert_ne!(labels[0], labels[2]);  // Separate from last two
//! ```

#![forbid(unsafe_code)]

pub mod cluster;
pub mod error;
pub mod metric;
pub mod vector;

pub use cluster::{Clustering, EmptyClusterPolicy, Kmeans, KmeansFit, RandomSource, RngSource};
pub use error::{Error, Result};
pub use metric::{Euclidean, Manhattan, Metric};
pub use vector::SparseVector;
