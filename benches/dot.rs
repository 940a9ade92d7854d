use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use ferrite_idx::Matrix;

fn dot(c: &mut Criterion) {
    let mut group = c.benchmark_group("dot");
    for size in [4, 8, 16, 32, 64, 128] {
        let left = Matrix::random(size, size);
        let right = Matrix::random(size, size);
        group.bench_with_input(BenchmarkId::new("reused", size), &size, |b, _| {
            let mut out = Matrix::default();
            b.iter(|| black_box(Matrix::dot(&left, &right, &mut out)))
        });
        group.bench_with_input(BenchmarkId::new("fresh", size), &size, |b, _| {
            b.iter(|| black_box(&left * &right))
        });
    }
    group.finish();
}

fn column_walk(c: &mut Criterion) {
    let m = Matrix::random(256, 256);
    c.bench_function("column_sum_256", |b| {
        b.iter(|| {
            (0..m.cols())
                .map(|j| m.column(j).sum::<f64>())
                .sum::<f64>()
        })
    });
}

criterion_group!(bench_dot, dot, column_walk);
criterion_main!(bench_dot);
