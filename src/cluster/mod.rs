//! Clustering algorithms for grouping similar items.
//!
//! This module provides hard partitional clustering for sparse vectors:
//! every item ends up in exactly one cluster.
//!
//! ## K-means
//!
//! The classic algorithm: assign each item to the nearest centroid, then
//! update centroids to the mean of their items. Repeat.
//!
//! **Objective**: Minimize within-cluster dispersion under the configured
//! metric; for Euclidean distance this is the within-cluster sum of squares:
//!
//! ```text
//! J = Σ_k Σ_{x ∈ C_k} ||x - μ_k||²
//! ```
//!
//! **Assumptions**:
//! - Clusters are roughly spherical under the chosen metric
//! - Clusters have similar sizes
//! - You know k in advance
//!
//! K-means can leave a cluster with no members mid-run; unlike most
//! implementations, the engine here makes that case explicit through
//! [`EmptyClusterPolicy`] instead of silently re-seeding.
//!
//! ## Usage
//!
//! ```rust
//! use glom::cluster::{Clustering, EmptyClusterPolicy, Kmeans};
//! use glom::vector::SparseVector;
//!
//! let data: Vec<SparseVector> = [[0.0, 0.0], [0.1, 0.1], [10.0, 10.0], [10.1, 10.1]]
//!     .iter()
//!     .map(|p| SparseVector::from(&p[..]))
//!     .collect();
//!
//! // Hard clustering with K-means; Drop shrinks k when a cluster starves.
//! let labels = Kmeans::new(2)
//!     .unwrap()
//!     .with_empty_cluster_policy(EmptyClusterPolicy::Drop)
//!     .unwrap()
//!     .with_seed(42)
//!     .fit_predict(&data)
//!     .unwrap();
//! assert_eq!(labels[0], labels[1]);  // First two together
//! assert_ne!(labels[0], labels[2]);  // Separate from last two
//! ```

mod kmeans;
mod traits;
mod util;

pub use kmeans::{EmptyClusterPolicy, Kmeans, KmeansFit};
pub use traits::Clustering;
pub use util::{RandomSource, RngSource};
