use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glom::{Clustering, Kmeans, SparseVector};
use rand::prelude::*;

fn bench_kmeans(c: &mut Criterion) {
    let mut group = c.benchmark_group("kmeans");

    // Synthetic sparse data: 16 of 256 features set per vector.
    let mut rng = StdRng::seed_from_u64(42);
    let n = 1000;
    let nnz = 16;
    let k = 10;

    let data: Vec<SparseVector> = (0..n)
        .map(|_| {
            SparseVector::from_pairs(
                (0..nnz)
                    .map(|_| (rng.random_range(0..256usize), rng.random::<f64>()))
                    .collect(),
            )
        })
        .collect();

    group.bench_function("fit_predict_n1000_nnz16_k10", |b| {
        b.iter(|| {
            let model = Kmeans::new(k).unwrap().with_max_iter(10).with_seed(42);
            model.fit_predict(black_box(&data)).unwrap();
        })
    });

    group.finish();
}

criterion_group!(benches, bench_kmeans);
criterion_main!(benches);
