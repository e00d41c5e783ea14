use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use partdft::LocalCluster;
use std::hint::black_box;

fn bench_cluster_transform(c: &mut Criterion) {
    let n = 2048;
    let x: Vec<f64> = (0..n).map(|i| ((i * 37) % 101) as f64 / 50.0 - 1.0).collect();
    let mut group = c.benchmark_group("cluster_transform_2048");
    group.sample_size(10);
    for &workers in &[1usize, 2, 4, 8] {
        let cluster = LocalCluster::new(workers).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(workers), &cluster, |b, cluster| {
            b.iter(|| cluster.transform(black_box(&x)).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_cluster_transform);
criterion_main!(benches);
