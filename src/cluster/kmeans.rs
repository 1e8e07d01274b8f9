//! K-means clustering over sparse vectors.
//!
//! # The Algorithm (Lloyd, 1957)
//!
//! Partitions data into k clusters by alternating two steps until the
//! partition stops moving:
//!
//! 1. **Assign**: each item goes to its nearest centroid under the
//!    configured [`Metric`].
//! 2. **Update**: each centroid becomes the exact component-wise mean of
//!    the items assigned to it.
//!
//! Initial centroids are k distinct items sampled uniformly without
//! replacement.
//!
//! ## Convergence
//!
//! The loop runs while *all* of the following hold:
//!
//! - total centroid movement in the last iteration exceeds `mean_tol`
//! - fewer than `max_iter` iterations have run
//! - more than `point_tol * n` items changed cluster in the last iteration
//!
//! The thresholds are per-engine fields, so independent engines can use
//! different criteria. Which condition ended the run is a diagnostic, not
//! part of the result.
//!
//! ## Tie-breaking
//!
//! Nearest-centroid comparison is strict (`<`): when an item is equidistant
//! from several centroids, the one with the lowest index wins and a later
//! equal distance never displaces it. Combined with the dataset-order
//! assignment pass, this makes a run a deterministic function of the data,
//! the metric, and the sampled initial indices.
//!
//! ## Empty clusters
//!
//! An iteration can leave a cluster with no members — typical with
//! duplicate-heavy data or unlucky seeding. [`EmptyClusterPolicy`] decides
//! what happens: abort the run, or drop the cluster and continue with a
//! smaller k.

use super::traits::Clustering;
use super::util::{sample_distinct, RandomSource, RngSource};
use crate::error::{Error, Result};
use crate::metric::{Euclidean, Metric};
use crate::vector::{self, SparseVector};
use rand::prelude::*;

/// What to do when an iteration leaves a cluster with no members.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EmptyClusterPolicy {
    /// Abort the run with [`Error::DegenerateClustering`]; no partial
    /// result is produced. Retrying with a different seed is up to the
    /// caller.
    Error,

    /// Remove the empty cluster, renumber the survivors, and continue with
    /// one cluster fewer.
    #[default]
    Drop,

    /// Move the single furthest item into the empty cluster.
    ///
    /// Not implemented. Selecting it fails at construction time rather than
    /// silently approximating.
    SingleFurthest,
}

/// K-means clustering engine.
///
/// Configuration is immutable once built; every [`fit`](Kmeans::fit) call
/// runs with its own state, so one engine can start any number of
/// independent runs.
#[derive(Clone, Debug)]
pub struct Kmeans<M: Metric = Euclidean> {
    /// Number of clusters to start from.
    k: usize,
    /// Distance function.
    metric: M,
    /// Empty-cluster handling.
    empty_policy: EmptyClusterPolicy,
    /// Centroid-movement tolerance (total metric distance per iteration).
    mean_tol: f64,
    /// Item-movement tolerance, as a fraction of the dataset size.
    point_tol: f64,
    /// Iteration cap.
    max_iter: usize,
    /// Seed for initial centroid sampling.
    seed: Option<u64>,
}

impl Kmeans<Euclidean> {
    /// Create a new K-means engine with `k` clusters and Euclidean distance.
    ///
    /// Fails with [`Error::InvalidParameter`] when `k < 1`. The check that
    /// `k` does not exceed the dataset size happens at fit time, since no
    /// data is in sight here.
    pub fn new(k: usize) -> Result<Self> {
        if k < 1 {
            return Err(Error::InvalidParameter {
                name: "k",
                message: "must be at least 1",
            });
        }

        Ok(Self {
            k,
            metric: Euclidean,
            empty_policy: EmptyClusterPolicy::default(),
            mean_tol: 1e-2,
            point_tol: 0.005,
            max_iter: 100,
            seed: None,
        })
    }
}

impl<M: Metric> Kmeans<M> {
    /// Swap in a different distance metric.
    pub fn with_metric<M2: Metric>(self, metric: M2) -> Kmeans<M2> {
        Kmeans {
            k: self.k,
            metric,
            empty_policy: self.empty_policy,
            mean_tol: self.mean_tol,
            point_tol: self.point_tol,
            max_iter: self.max_iter,
            seed: self.seed,
        }
    }

    /// Set the empty-cluster policy.
    ///
    /// [`EmptyClusterPolicy::SingleFurthest`] is rejected here with a
    /// configuration error; it never reaches a running fit.
    pub fn with_empty_cluster_policy(mut self, policy: EmptyClusterPolicy) -> Result<Self> {
        if policy == EmptyClusterPolicy::SingleFurthest {
            return Err(Error::InvalidParameter {
                name: "empty_cluster_policy",
                message: "SingleFurthest is not implemented",
            });
        }
        self.empty_policy = policy;
        Ok(self)
    }

    /// Set the centroid-movement tolerance: the run stops once the summed
    /// metric distance moved by all centroids in one iteration drops to
    /// this value or below.
    pub fn with_mean_tol(mut self, mean_tol: f64) -> Self {
        self.mean_tol = mean_tol;
        self
    }

    /// Set the item-movement tolerance as a fraction of the dataset size.
    pub fn with_point_tol(mut self, point_tol: f64) -> Self {
        self.point_tol = point_tol;
        self
    }

    /// Set the iteration cap.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the random seed for initial centroid sampling.
    ///
    /// With a seed, repeated fits on the same data produce identical
    /// results.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Cluster `data`, drawing initial centroids from the configured seed
    /// (or from entropy when unseeded).
    pub fn fit<'a>(&self, data: &'a [SparseVector]) -> Result<KmeansFit<'a>> {
        let rng: Box<dyn RngCore> = match self.seed {
            Some(s) => Box::new(StdRng::seed_from_u64(s)),
            None => Box::new(rand::rng()),
        };
        self.fit_with(data, &mut RngSource(rng))
    }

    /// Cluster `data` using an explicit index source for the initial
    /// centroid sampling.
    ///
    /// The source is consulted only during initialization; the iteration
    /// itself is fully deterministic.
    pub fn fit_with<'a>(
        &self,
        data: &'a [SparseVector],
        source: &mut dyn RandomSource,
    ) -> Result<KmeansFit<'a>> {
        let n = data.len();
        if n == 0 {
            return Err(Error::EmptyInput);
        }
        if self.k > n {
            return Err(Error::InvalidClusterCount {
                requested: self.k,
                n_items: n,
            });
        }

        // Initial centroids: k distinct items, sampled without replacement.
        let mut centroids: Vec<SparseVector> = sample_distinct(source, self.k, n)
            .into_iter()
            .map(|index| data[index].clone())
            .collect();

        let mut assignments = vec![0usize; n];
        let mut k = self.k;
        let mut delta_means = f64::INFINITY;
        let mut delta_points = n;
        let mut iterations = 0usize;

        while delta_means > self.mean_tol
            && iterations < self.max_iter
            && delta_points as f64 > self.point_tol * n as f64
        {
            iterations += 1;
            delta_points = 0;

            // Assignment pass, in dataset order. Strict `<` keeps the first
            // minimum: an equal later distance never wins.
            let mut buckets: Vec<Vec<usize>> = vec![Vec::new(); k];
            for (i, item) in data.iter().enumerate() {
                let mut best = 0usize;
                let mut best_dist = f64::INFINITY;
                for (c, centroid) in centroids.iter().enumerate() {
                    let dist = self.metric.distance(item, centroid);
                    if dist < best_dist {
                        best_dist = dist;
                        best = c;
                    }
                }

                buckets[best].push(i);
                if assignments[i] != best {
                    assignments[i] = best;
                    delta_points += 1;
                }
            }

            if let Some(first_empty) = buckets.iter().position(Vec::is_empty) {
                match self.empty_policy {
                    EmptyClusterPolicy::Error => {
                        return Err(Error::DegenerateClustering {
                            cluster: first_empty,
                        });
                    }
                    EmptyClusterPolicy::Drop => {
                        // Compact in one pass: collect survivors, build the
                        // renumbering map, rewrite the assignment array once.
                        // Every assignment points at a non-empty bucket (its
                        // own item is in it), so the remap is total.
                        let mut survivors: Vec<usize> = Vec::with_capacity(k);
                        let mut remap = vec![usize::MAX; k];
                        for (c, bucket) in buckets.iter().enumerate() {
                            if !bucket.is_empty() {
                                remap[c] = survivors.len();
                                survivors.push(c);
                            }
                        }

                        for a in &mut assignments {
                            *a = remap[*a];
                        }

                        let mut old_buckets =
                            std::mem::replace(&mut buckets, Vec::with_capacity(survivors.len()));
                        let mut old_centroids =
                            std::mem::replace(&mut centroids, Vec::with_capacity(survivors.len()));
                        for &c in &survivors {
                            buckets.push(std::mem::take(&mut old_buckets[c]));
                            centroids.push(std::mem::take(&mut old_centroids[c]));
                        }

                        k = survivors.len();
                    }
                    // `with_empty_cluster_policy` rejects this variant, so
                    // the field can never hold it.
                    EmptyClusterPolicy::SingleFurthest => unreachable!(),
                }
            }

            // Update pass: every surviving centroid becomes the mean of its
            // bucket; the centroid set is replaced wholesale.
            delta_means = 0.0;
            let mut new_centroids: Vec<SparseVector> = Vec::with_capacity(k);
            for (c, bucket) in buckets.iter().enumerate() {
                // Non-empty after policy handling above.
                let new_centroid = vector::mean(bucket.iter().map(|&i| &data[i]))
                    .expect("bucket must be non-empty");
                delta_means += self.metric.distance(&centroids[c], &new_centroid);
                new_centroids.push(new_centroid);
            }
            centroids = new_centroids;
        }

        Ok(KmeansFit {
            data,
            assignments,
            n_clusters: k,
            centroids,
            iterations,
        })
    }
}

impl<M: Metric> Clustering for Kmeans<M> {
    fn fit_predict(&self, data: &[SparseVector]) -> Result<Vec<usize>> {
        self.fit(data).map(KmeansFit::into_assignments)
    }

    fn n_clusters(&self) -> usize {
        self.k
    }
}

/// Immutable result of one K-means run.
///
/// Holds the final assignments, the final cluster count, the final
/// centroids, and a back-reference to the clustered data. Every
/// [`Kmeans::fit`] call produces a fresh value; nothing here mutates.
#[derive(Clone, Debug)]
pub struct KmeansFit<'a> {
    data: &'a [SparseVector],
    assignments: Vec<usize>,
    n_clusters: usize,
    centroids: Vec<SparseVector>,
    iterations: usize,
}

impl<'a> KmeansFit<'a> {
    /// One cluster label per item, in dataset order.
    pub fn assignments(&self) -> &[usize] {
        &self.assignments
    }

    /// Consume the fit, keeping only the labels.
    pub fn into_assignments(self) -> Vec<usize> {
        self.assignments
    }

    /// Cluster of item `item`.
    ///
    /// # Panics
    ///
    /// Panics when `item` is out of range for the clustered data.
    pub fn cluster_of(&self, item: usize) -> usize {
        self.assignments[item]
    }

    /// Number of clusters in the final partition.
    ///
    /// Under [`EmptyClusterPolicy::Drop`] this may be smaller than the
    /// requested k; it never grows.
    pub fn n_clusters(&self) -> usize {
        self.n_clusters
    }

    /// Final centroids, indexed by cluster.
    pub fn centroids(&self) -> &[SparseVector] {
        &self.centroids
    }

    /// The clustered data.
    pub fn data(&self) -> &'a [SparseVector] {
        self.data
    }

    /// Item indices assigned to `cluster`, in dataset order.
    pub fn members(&self, cluster: usize) -> impl Iterator<Item = usize> + '_ {
        self.assignments
            .iter()
            .enumerate()
            .filter(move |&(_, &a)| a == cluster)
            .map(|(i, _)| i)
    }

    /// Number of clustered items.
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Whether the fit covers zero items.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Assign/update iterations performed. Diagnostic only.
    pub fn n_iterations(&self) -> usize {
        self.iterations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::Manhattan;

    /// Index source that replays a fixed script.
    struct Scripted(Vec<usize>);

    impl RandomSource for Scripted {
        fn next_index(&mut self, _bound: usize) -> usize {
            self.0.remove(0)
        }
    }

    fn line(values: &[f64]) -> Vec<SparseVector> {
        values
            .iter()
            .map(|&v| SparseVector::from_pairs(vec![(0, v)]))
            .collect()
    }

    fn points(points: &[[f64; 2]]) -> Vec<SparseVector> {
        points.iter().map(|p| SparseVector::from(&p[..])).collect()
    }

    #[test]
    fn test_two_separated_groups_converge_in_one_iteration() {
        let data = line(&[0.0, 0.0, 0.0, 10.0, 10.0, 10.0]);
        let kmeans = Kmeans::new(2)
            .unwrap()
            .with_empty_cluster_policy(EmptyClusterPolicy::Error)
            .unwrap()
            .with_metric(Manhattan);

        let fit = kmeans.fit_with(&data, &mut Scripted(vec![0, 3])).unwrap();

        assert_eq!(fit.assignments(), &[0, 0, 0, 1, 1, 1]);
        assert_eq!(fit.n_clusters(), 2);
        // Centroids land on the group means and stop moving immediately.
        assert_eq!(fit.n_iterations(), 1);
        assert_eq!(fit.centroids()[0].get(0), 0.0);
        assert_eq!(fit.centroids()[1].get(0), 10.0);
    }

    #[test]
    fn test_identical_points_error_policy_fails() {
        // Both sampled centroids are the zero vector; the tie-break sends
        // every item to cluster 0 and cluster 1 starves.
        let data = line(&[0.0, 0.0, 0.0, 0.0]);
        let kmeans = Kmeans::new(2)
            .unwrap()
            .with_empty_cluster_policy(EmptyClusterPolicy::Error)
            .unwrap();

        let err = kmeans
            .fit_with(&data, &mut Scripted(vec![0, 1]))
            .unwrap_err();
        assert!(matches!(err, Error::DegenerateClustering { cluster: 1 }));
    }

    #[test]
    fn test_identical_points_drop_policy_shrinks_k() {
        let data = line(&[0.0, 0.0, 0.0, 0.0]);
        let kmeans = Kmeans::new(2)
            .unwrap()
            .with_empty_cluster_policy(EmptyClusterPolicy::Drop)
            .unwrap();

        let fit = kmeans.fit_with(&data, &mut Scripted(vec![0, 1])).unwrap();

        assert_eq!(fit.n_clusters(), 1);
        assert_eq!(fit.assignments(), &[0, 0, 0, 0]);
        assert_eq!(fit.centroids().len(), 1);
    }

    #[test]
    fn test_tie_break_keeps_first_centroid() {
        // Item 2 sits exactly between the two initial centroids 0 and 10.
        let data = line(&[0.0, 10.0, 5.0]);
        let kmeans = Kmeans::new(2).unwrap().with_max_iter(1);

        let fit = kmeans.fit_with(&data, &mut Scripted(vec![0, 1])).unwrap();
        assert_eq!(fit.cluster_of(2), 0);
    }

    #[test]
    fn test_drop_renumbers_surviving_clusters() {
        // Centroids sampled from items 0, 1, 2; items 0 and 1 are identical,
        // so cluster 1 starves and cluster 2 must shift down to index 1.
        let data = line(&[0.0, 0.0, 5.0]);
        let kmeans = Kmeans::new(3)
            .unwrap()
            .with_empty_cluster_policy(EmptyClusterPolicy::Drop)
            .unwrap();

        let fit = kmeans
            .fit_with(&data, &mut Scripted(vec![0, 1, 2]))
            .unwrap();

        assert_eq!(fit.n_clusters(), 2);
        assert_eq!(fit.assignments(), &[0, 0, 1]);
        assert_eq!(fit.centroids()[1].get(0), 5.0);
    }

    #[test]
    fn test_centroids_are_means_of_members() {
        let data = points(&[
            [0.0, 0.0],
            [0.5, 1.0],
            [1.0, 0.5],
            [9.0, 9.0],
            [10.0, 8.0],
            [11.0, 10.0],
        ]);
        let fit = Kmeans::new(2).unwrap().with_seed(42).fit(&data).unwrap();

        for c in 0..fit.n_clusters() {
            let members: Vec<usize> = fit.members(c).collect();
            assert!(!members.is_empty());
            let mean = vector::mean(members.iter().map(|&i| &data[i])).unwrap();
            assert_eq!(fit.centroids()[c], mean);
        }
    }

    #[test]
    fn test_deterministic_with_seed() {
        let data = points(&[
            [0.0, 0.0],
            [0.1, 0.1],
            [5.0, 5.0],
            [5.1, 5.1],
            [10.0, 0.0],
            [10.1, 0.1],
        ]);

        let a = Kmeans::new(3).unwrap().with_seed(7).fit(&data).unwrap();
        let b = Kmeans::new(3).unwrap().with_seed(7).fit(&data).unwrap();

        assert_eq!(a.assignments(), b.assignments());
        assert_eq!(a.centroids(), b.centroids());
        assert_eq!(a.n_clusters(), b.n_clusters());
    }

    #[test]
    fn test_k_equals_n_with_distinct_points() {
        // Error policy doubles as a check that the initial sample really is
        // without replacement: a repeated index would starve a cluster.
        let data = line(&[0.0, 5.0, 10.0]);
        let fit = Kmeans::new(3)
            .unwrap()
            .with_empty_cluster_policy(EmptyClusterPolicy::Error)
            .unwrap()
            .with_seed(42)
            .fit(&data)
            .unwrap();

        let unique: std::collections::HashSet<_> = fit.assignments().iter().collect();
        assert_eq!(unique.len(), 3);
    }

    #[test]
    fn test_iteration_cap_is_honored() {
        let data = line(&[0.0, 10.0, 5.0]);
        let fit = Kmeans::new(2)
            .unwrap()
            .with_max_iter(1)
            .fit_with(&data, &mut Scripted(vec![0, 1]))
            .unwrap();
        assert_eq!(fit.n_iterations(), 1);

        let fit = Kmeans::new(2)
            .unwrap()
            .fit_with(&data, &mut Scripted(vec![0, 1]))
            .unwrap();
        assert!(fit.n_iterations() <= 100);
    }

    #[test]
    fn test_k_zero_rejected_at_construction() {
        assert!(matches!(
            Kmeans::new(0),
            Err(Error::InvalidParameter { name: "k", .. })
        ));
    }

    #[test]
    fn test_single_furthest_rejected_at_construction() {
        let result = Kmeans::new(2)
            .unwrap()
            .with_empty_cluster_policy(EmptyClusterPolicy::SingleFurthest);
        assert!(matches!(
            result,
            Err(Error::InvalidParameter {
                name: "empty_cluster_policy",
                ..
            })
        ));
    }

    #[test]
    fn test_k_larger_than_n_error() {
        let data = line(&[0.0, 1.0]);
        let err = Kmeans::new(5).unwrap().fit(&data).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidClusterCount {
                requested: 5,
                n_items: 2
            }
        ));
    }

    #[test]
    fn test_empty_input_error() {
        let data: Vec<SparseVector> = vec![];
        assert!(matches!(
            Kmeans::new(1).unwrap().fit(&data),
            Err(Error::EmptyInput)
        ));
    }

    #[test]
    fn test_single_item_single_cluster() {
        let data = line(&[3.0]);
        let fit = Kmeans::new(1).unwrap().with_seed(1).fit(&data).unwrap();

        assert_eq!(fit.assignments(), &[0]);
        assert_eq!(fit.n_clusters(), 1);
        assert_eq!(fit.centroids()[0].get(0), 3.0);
        assert_eq!(fit.n_iterations(), 1);
    }

    #[test]
    fn test_fit_predict_matches_fit() {
        let data = points(&[[0.0, 0.0], [0.1, 0.1], [10.0, 10.0], [10.1, 10.1]]);
        let kmeans = Kmeans::new(2).unwrap().with_seed(42);

        let fit = kmeans.fit(&data).unwrap();
        let labels = kmeans.fit_predict(&data).unwrap();
        assert_eq!(labels, fit.assignments());
    }
}
