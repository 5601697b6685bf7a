//! Criterion benchmarks for the GM-PHD recursion.
//!
//! Run with: cargo bench
//! Run a single group: cargo bench -- propagate

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use gmphd::common::ground_truth::{generate_measurements, MeasurementSet, ScenarioConfig, TargetTruth};
use gmphd::common::rng::SimpleRng;
use gmphd::{GaussianComponent, GmPhdFilter, Real};
use nalgebra::{DMatrix, DVector};

fn scenario(num_targets: usize, clutter_rate: Real) -> (GmPhdFilter, Vec<MeasurementSet>) {
    let config = ScenarioConfig {
        measure_dim: 3,
        num_steps: 20,
        sampling_period: 1.0,
        detection_probability: 0.95,
        measurement_noise: 0.5,
        clutter_rate,
        surveillance_min: -100.0,
        surveillance_max: 100.0,
    };

    let mut truths = Vec::with_capacity(num_targets);
    let mut births = Vec::with_capacity(num_targets);
    for i in 0..num_targets {
        let offset = -80.0 + 160.0 * i as Real / num_targets as Real;
        truths.push(TargetTruth::new(
            0,
            config.num_steps,
            vec![offset, -offset, 0.0],
            vec![1.0, 0.0, 0.0],
        ));
        births.push(GaussianComponent::new(
            0.2,
            DVector::from_vec(vec![offset, -offset, 0.0, 0.0, 0.0, 0.0]),
            DMatrix::identity(6, 6) * 2.0,
        ));
    }

    let mut rng = SimpleRng::new(42);
    let steps = generate_measurements(&mut rng, &config, &truths);

    let mut filter = GmPhdFilter::new(100, 3, true, false);
    filter.set_birth_model(births).unwrap();
    filter.set_dynamics_model(1.0, 0.2);
    filter.set_observation_model(0.95, 0.5, 0.5, 1e-6);
    filter.set_pruning_parameters(0.01, 4.0, 100);
    filter.set_survival_probability(0.99);

    (filter, steps)
}

fn run_steps(filter: &mut GmPhdFilter, steps: &[MeasurementSet]) -> usize {
    for set in steps {
        filter
            .set_new_measurements(&set.positions, &set.speeds)
            .unwrap();
        filter.propagate().unwrap();
    }
    filter.current_targets().len()
}

fn bench_propagate(c: &mut Criterion) {
    let mut group = c.benchmark_group("propagate");

    for &num_targets in &[2usize, 5, 10] {
        let (filter, steps) = scenario(num_targets, 2.0);
        group.bench_with_input(
            BenchmarkId::new("targets", num_targets),
            &num_targets,
            |b, _| {
                b.iter(|| {
                    let mut f = filter.clone();
                    criterion::black_box(run_steps(&mut f, &steps))
                })
            },
        );
    }

    group.finish();
}

fn bench_clutter_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("clutter");

    for &rate in &[0.0 as Real, 5.0, 20.0] {
        let (filter, steps) = scenario(3, rate);
        group.bench_with_input(
            BenchmarkId::new("rate", rate as usize),
            &rate,
            |b, _| {
                b.iter(|| {
                    let mut f = filter.clone();
                    criterion::black_box(run_steps(&mut f, &steps))
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_propagate, bench_clutter_load);
criterion_main!(benches);
