//! Performance benchmarks for PerfLab kernels
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use perflab::fractal::{JuliaGrid, JuliaKernel, Region, DEFAULT_C, DEFAULT_MAX_ITER};
use perflab::prime::{count_primes, is_prime_with, PrimeStrategy};

fn bench_prime_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("is_prime");

    for strategy in PrimeStrategy::ALL {
        group.bench_with_input(
            BenchmarkId::new(strategy.name(), 10_000_019),
            &10_000_019i64,
            |b, &n| {
                b.iter(|| black_box(is_prime_with(black_box(n), strategy)));
            },
        );
    }

    group.finish();
}

fn bench_prime_counting(c: &mut Criterion) {
    let mut group = c.benchmark_group("count_primes");
    group.throughput(Throughput::Elements(100_000));

    for strategy in PrimeStrategy::ALL {
        group.bench_function(strategy.name(), |b| {
            b.iter(|| black_box(count_primes(0..=black_box(100_000), strategy)));
        });
    }

    group.finish();
}

fn bench_julia_kernels(c: &mut Criterion) {
    let mut group = c.benchmark_group("julia");
    group.sample_size(20);

    for width in [100usize, 300] {
        let grid = JuliaGrid::generate(&Region::default(), width, DEFAULT_C).unwrap();
        group.throughput(Throughput::Elements(grid.len() as u64));

        for kernel in JuliaKernel::ALL {
            group.bench_with_input(BenchmarkId::new(kernel.name(), width), &grid, |b, grid| {
                b.iter(|| black_box(grid.escape_counts(kernel, DEFAULT_MAX_ITER).unwrap()));
            });
        }
    }

    group.finish();
}

fn bench_grid_generation(c: &mut Criterion) {
    c.bench_function("generate_grid_1000", |b| {
        b.iter(|| black_box(JuliaGrid::generate(&Region::default(), black_box(1000), DEFAULT_C).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_prime_strategies,
    bench_prime_counting,
    bench_julia_kernels,
    bench_grid_generation
);

criterion_main!(benches);
