use std::sync::Arc;

use cvi_tabu::cvi::{CalinskiHarabaszIndex, Cvi, DunnIndex, GammaIndex};
use cvi_tabu::PointMatrix;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};

fn random_points(n: usize, d: usize, seed: u64) -> Vec<f64> {
    let mut state = seed;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state % 1000) as f64 / 10.0
    };
    (0..n * d).map(|_| next()).collect()
}

fn labels_for(n: usize, k: u8) -> Vec<u8> {
    (0..n).map(|i| (i % k as usize) as u8).collect()
}

fn bench_modify_compute_undo(c: &mut Criterion) {
    let n = 512;
    let d = 8;
    let k = 4;
    let x = Arc::new(PointMatrix::new(random_points(n, d, 1), n, d).unwrap());
    let labels = labels_for(n, k);

    let mut group = c.benchmark_group("modify_compute_undo");

    group.bench_function("calinski_harabasz", |b| {
        let mut idx = CalinskiHarabaszIndex::new(x.clone(), k, true).unwrap();
        idx.set_labels(&labels).unwrap();
        b.iter_batched(
            || (0usize, (idx.get_label(0) + 1) % k),
            |(i, j)| {
                idx.modify(i, j);
                let r = idx.compute();
                idx.undo();
                r
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("gamma", |b| {
        let mut idx = GammaIndex::new(x.clone(), k, true).unwrap();
        idx.set_labels(&labels).unwrap();
        b.iter_batched(
            || (0usize, (idx.get_label(0) + 1) % k),
            |(i, j)| {
                idx.modify(i, j);
                let r = idx.compute();
                idx.undo();
                r
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("dunn", |b| {
        let mut idx = DunnIndex::new(x.clone(), k, true).unwrap();
        idx.set_labels(&labels).unwrap();
        b.iter_batched(
            || (0usize, (idx.get_label(0) + 1) % k),
            |(i, j)| {
                idx.modify(i, j);
                let r = idx.compute();
                idx.undo();
                r
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, bench_modify_compute_undo);
criterion_main!(benches);
