//! Performance benchmarks for contact-surface-area
//!
//! # Running Benchmarks
//!
//! Run all benchmarks:
//! ```bash
//! cargo bench
//! ```
//!
//! Run specific benchmark group:
//! ```bash
//! cargo bench --bench performance distance_field
//! cargo bench --bench performance threshold
//! cargo bench --bench performance pipeline
//! ```
//!
//! # Benchmark Groups
//!
//! - **distance_field**: brute force vs k-d tree nearest centroid distances
//! - **threshold**: two-segment elbow fit over sorted distances
//! - **pipeline**: complete run on two touching cubes

use contact_surface_area::config::CsaConfig;
use contact_surface_area::contact::{
    compute_distance_field, fit_two_segments, CsaPipeline, DistanceMethod,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use synthetic_mesh::{generate_touching_cubes, subdivisions_for_faces};

const PARALLEL_THRESHOLD: usize = 1000;

fn benchmark_distance_field(c: &mut Criterion) {
    let mut group = c.benchmark_group("distance_field");
    group.sample_size(10);

    let scales = vec![("1K", 1_000), ("10K", 10_000)];

    for (name, target_faces) in scales {
        let roles = generate_touching_cubes(subdivisions_for_faces(target_faces));
        let actual_faces = roles.probe.num_faces();

        group.throughput(Throughput::Elements(actual_faces as u64));

        for (label, method) in [
            ("brute_force", DistanceMethod::BruteForce),
            ("kd_tree", DistanceMethod::KdTree),
        ] {
            group.bench_with_input(BenchmarkId::new(label, name), &roles, |b, roles| {
                b.iter(|| {
                    compute_distance_field(
                        black_box(&roles.probe),
                        black_box(&roles.reference),
                        method,
                        PARALLEL_THRESHOLD,
                    )
                })
            });
        }
    }

    group.finish();
}

fn benchmark_threshold(c: &mut Criterion) {
    let mut group = c.benchmark_group("threshold");

    for samples in [100, 1_000, 5_000] {
        // Flat contact regime followed by a steep ramp
        let knee = samples / 5;
        let sorted: Vec<f64> = (0..samples)
            .map(|j| {
                if j < knee {
                    1e-4 * j as f64
                } else {
                    0.5 + 0.01 * (j - knee) as f64
                }
            })
            .collect();

        group.throughput(Throughput::Elements(samples as u64));
        group.bench_with_input(BenchmarkId::from_parameter(samples), &sorted, |b, sorted| {
            b.iter(|| fit_two_segments(black_box(sorted)))
        });
    }

    group.finish();
}

fn benchmark_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    group.sample_size(10);

    let config = CsaConfig {
        distance_method: DistanceMethod::KdTree,
        ..CsaConfig::default()
    };
    let pipeline = CsaPipeline::new(config);

    for (name, target_faces) in [("1K", 1_000), ("5K", 5_000)] {
        let roles = generate_touching_cubes(subdivisions_for_faces(target_faces));

        group.throughput(Throughput::Elements(roles.probe.num_faces() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &roles, |b, roles| {
            b.iter(|| pipeline.run(black_box(roles)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_distance_field,
    benchmark_threshold,
    benchmark_pipeline
);
criterion_main!(benches);
