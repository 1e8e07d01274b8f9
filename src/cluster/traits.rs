use crate::error::Result;
use crate::vector::SparseVector;

/// Common interface for hard clustering algorithms (one label per item).
pub trait Clustering {
    /// Fit the model (if needed) and return one cluster label per input item.
    fn fit_predict(&self, data: &[SparseVector]) -> Result<Vec<usize>>;

    /// The configured number of clusters (if applicable).
    ///
    /// For algorithms that discover the number of clusters dynamically,
    /// this returns 0.
    fn n_clusters(&self) -> usize;
}
