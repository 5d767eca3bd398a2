use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use simd_kernels::simd::vector_ops::scalar;
use simd_kernels::simd::{vector_add_f32, vector_dot_f32, vector_mul_f32};

const SIZES: [usize; 4] = [32, 1024, 16 * 1024, 256 * 1024];

fn generate_inputs(n: usize) -> (Vec<f32>, Vec<f32>) {
    let a = (0..n).map(|i| (i % 17) as f32 * 0.5).collect();
    let b = (0..n).map(|i| (i % 13) as f32 * 0.25).collect();
    (a, b)
}

fn bench_vector_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("vector_add_f32");

    for &n in &SIZES {
        let (a, b) = generate_inputs(n);
        let mut out = vec![0.0f32; n];

        group.bench_with_input(BenchmarkId::new("dispatch", n), &n, |bench, _| {
            bench.iter(|| vector_add_f32(black_box(&a), black_box(&b), &mut out));
        });
        group.bench_with_input(BenchmarkId::new("scalar", n), &n, |bench, _| {
            bench.iter(|| scalar::vector_add_f32_scalar(black_box(&a), black_box(&b), &mut out));
        });
    }

    group.finish();
}

fn bench_vector_mul(c: &mut Criterion) {
    let mut group = c.benchmark_group("vector_mul_f32");

    for &n in &SIZES {
        let (a, b) = generate_inputs(n);
        let mut out = vec![0.0f32; n];

        group.bench_with_input(BenchmarkId::new("dispatch", n), &n, |bench, _| {
            bench.iter(|| vector_mul_f32(black_box(&a), black_box(&b), &mut out));
        });
        group.bench_with_input(BenchmarkId::new("scalar", n), &n, |bench, _| {
            bench.iter(|| scalar::vector_mul_f32_scalar(black_box(&a), black_box(&b), &mut out));
        });
    }

    group.finish();
}

fn bench_vector_dot(c: &mut Criterion) {
    let mut group = c.benchmark_group("vector_dot_f32");

    for &n in &SIZES {
        let (a, b) = generate_inputs(n);

        group.bench_with_input(BenchmarkId::new("dispatch", n), &n, |bench, _| {
            bench.iter(|| black_box(vector_dot_f32(black_box(&a), black_box(&b))));
        });
        group.bench_with_input(BenchmarkId::new("scalar", n), &n, |bench, _| {
            bench.iter(|| black_box(scalar::vector_dot_f32_scalar(black_box(&a), black_box(&b))));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_vector_add, bench_vector_mul, bench_vector_dot);
criterion_main!(benches);
