//! K-means on a simple sparse 2D dataset.

use glom::{EmptyClusterPolicy, Kmeans, SparseVector};

fn main() {
    // Three well-separated clusters in 2D.
    let points: Vec<[f64; 2]> = vec![
        // Cluster A (near origin)
        [0.0, 0.0],
        [0.1, 0.2],
        [0.2, 0.1],
        [-0.1, 0.1],
        // Cluster B (near (5, 5))
        [5.0, 5.0],
        [5.1, 4.9],
        [4.9, 5.1],
        [5.2, 5.2],
        // Cluster C (near (10, 0))
        [10.0, 0.0],
        [10.1, 0.1],
        [9.9, -0.1],
        [10.2, 0.2],
    ];
    let data: Vec<SparseVector> = points.iter().map(|p| SparseVector::from(&p[..])).collect();

    // --- K-means (k=3) ---
    let kmeans = Kmeans::new(3).expect("k >= 1").with_seed(42);
    let fit = kmeans.fit(&data).expect("fit");
    println!("=== K-means (k=3) ===");
    for (i, label) in fit.assignments().iter().enumerate() {
        println!(
            "  point {:2} ({:5.1}, {:5.1}) => cluster {}",
            i, points[i][0], points[i][1], label
        );
    }
    println!("\ncentroids ({} iterations):", fit.n_iterations());
    for (c, centroid) in fit.centroids().iter().enumerate() {
        println!(
            "  cluster {} => ({:5.2}, {:5.2})",
            c,
            centroid.get(0),
            centroid.get(1)
        );
    }

    // --- Empty-cluster handling ---
    // Six identical points cannot support three clusters; the Drop policy
    // shrinks k instead of failing the run.
    let dupes: Vec<SparseVector> = vec![SparseVector::from(&[1.0, 1.0][..]); 6];
    let fit = Kmeans::new(3)
        .expect("k >= 1")
        .with_empty_cluster_policy(EmptyClusterPolicy::Drop)
        .expect("supported policy")
        .with_seed(7)
        .fit(&dupes)
        .expect("fit");
    println!("\n=== Drop policy on 6 identical points (k=3) ===");
    println!("  final clusters: {}", fit.n_clusters());
}
