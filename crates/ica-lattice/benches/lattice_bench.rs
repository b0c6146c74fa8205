//! Benchmarks for the ICA lattice
//!
//! Measures performance of:
//! - Lattice creation and population
//! - Full update cycles under both neighborhoods
//! - Cluster counting on random and fully active lattices
//! - The complete statistics pass

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ica_lattice::{count_clusters, Automaton, Lattice, Neighborhood, Statistics};

const SIZES: [usize; 4] = [16, 64, 128, 256];

fn seeded(size: usize) -> Automaton {
    let mut ica = Automaton::new(42);
    ica.create_seeded(size, 1.0, 42).expect("lattice");
    ica
}

/// Benchmark lattice allocation plus random fill
fn bench_create(c: &mut Criterion) {
    let mut group = c.benchmark_group("create");

    for &size in &SIZES {
        group.throughput(Throughput::Elements((size * size) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &l| {
            let mut ica = Automaton::new(1);
            b.iter(|| ica.create_seeded(black_box(l), 1.0, 7))
        });
    }
    group.finish();
}

/// Benchmark one full cycle (L*L single-site updates)
fn bench_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("cycle");

    for hood in [Neighborhood::VonNeumann, Neighborhood::Moore] {
        for &size in &SIZES {
            group.throughput(Throughput::Elements((size * size) as u64));
            group.bench_with_input(BenchmarkId::new(hood.to_string(), size), &size, |b, &l| {
                let mut ica = seeded(l);
                b.iter(|| ica.run(hood, black_box(1), 0))
            });
        }
    }
    group.finish();
}

/// Benchmark the flood fill on a random lattice and a single giant cluster
fn bench_clusters(c: &mut Criterion) {
    let mut group = c.benchmark_group("count_clusters");

    for &size in &SIZES {
        group.throughput(Throughput::Elements((size * size) as u64));

        let mut ica = seeded(size);
        ica.run_von_neumann(10, 0).expect("run");
        let random = ica.lattice().expect("lattice").clone();
        group.bench_with_input(BenchmarkId::new("random", size), &random, |b, lattice| {
            b.iter(|| count_clusters(black_box(lattice)))
        });

        let full = Lattice::filled(size, 1.0, 1).expect("lattice");
        group.bench_with_input(BenchmarkId::new("full", size), &full, |b, lattice| {
            b.iter(|| count_clusters(black_box(lattice)))
        });
    }
    group.finish();
}

/// Benchmark the complete statistics pass
fn bench_statistics(c: &mut Criterion) {
    let mut group = c.benchmark_group("statistics");
    group.sample_size(50);

    for &size in &SIZES {
        let ica = seeded(size);
        let lattice = ica.lattice().expect("lattice");
        group.throughput(Throughput::Elements((size * size) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), lattice, |b, lattice| {
            b.iter(|| Statistics::compute(black_box(lattice)))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_create,
    bench_cycle,
    bench_clusters,
    bench_statistics,
);

criterion_main!(benches);
